use std::{net::TcpListener, sync::Arc};

use pennypress::{
    catalog::ArticleCatalog,
    config::Config,
    db_helpers::{MemStorage, Storage},
    init_catalog, make_router,
    models::{NewArticle, NewAuthor, NewUser},
    serve,
};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

struct TestApp {
    base_url: String,
    client: Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post_empty(&self, path: &str) -> reqwest::Response {
        self.client.post(self.url(path)).send().await.unwrap()
    }

    async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }
}

async fn spawn_with(catalog: ArticleCatalog) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(serve(
        listener,
        make_router(),
        Arc::new(catalog),
        std::future::pending(),
    ));
    TestApp {
        base_url: format!("http://{}", address),
        client: Client::new(),
    }
}

/// Server over an empty in-memory catalog holding one featured Technology
/// article priced at "0.10", one reader, and an article whose author is gone.
async fn spawn_app() -> (TestApp, Fixture) {
    let storage = MemStorage::new();
    let writer = storage
        .insert_user(NewUser {
            username: "writer".to_string(),
            password: "hash".to_string(),
            name: "Wendy Writer".to_string(),
            email: "writer@example.com".to_string(),
            avatar_url: Some("https://images.example.com/wendy.png".to_string()),
            bio: Some("Writes things".to_string()),
        })
        .await
        .unwrap();
    let reader = storage
        .insert_user(NewUser {
            username: "reader".to_string(),
            password: "hash".to_string(),
            name: "Rita Reader".to_string(),
            email: "reader@example.com".to_string(),
            avatar_url: None,
            bio: None,
        })
        .await
        .unwrap();
    let author = storage
        .insert_author(NewAuthor {
            user_id: writer.id,
            description: Some("Technology desk".to_string()),
        })
        .await
        .unwrap();
    let published_date = chrono::Utc::now() - chrono::Duration::days(1);
    let article = storage
        .insert_article(NewArticle {
            title: "Chips Are Getting Weird".to_string(),
            excerpt: "Chiplets, stacking and the end of easy scaling.".to_string(),
            content: "<p>Quantum tunnelling is now a design constraint.</p>".to_string(),
            image_url: "https://images.example.com/chips.jpg".to_string(),
            published_date,
            author_id: author.id,
            category: "Technology".to_string(),
            price: "0.10".to_string(),
            read_time: 6,
            featured: true,
            publication: Some("Wired".to_string()),
        })
        .await
        .unwrap();
    let orphan = storage
        .insert_article(NewArticle {
            title: "Nobody Wrote This".to_string(),
            excerpt: "Lost author".to_string(),
            content: "<p>Quantum</p>".to_string(),
            image_url: "https://images.example.com/void.jpg".to_string(),
            published_date,
            author_id: 404,
            category: "Technology".to_string(),
            price: "0.10".to_string(),
            read_time: 1,
            featured: true,
            publication: None,
        })
        .await
        .unwrap();

    let app = spawn_with(ArticleCatalog::new(Arc::new(storage))).await;
    let fixture = Fixture {
        article_id: article.id,
        orphan_id: orphan.id,
        author_id: author.id,
        reader_id: reader.id,
    };
    (app, fixture)
}

struct Fixture {
    article_id: i64,
    orphan_id: i64,
    author_id: i64,
    reader_id: i64,
}

async fn create_comment(app: &TestApp, fixture: &Fixture, content: &str) -> Value {
    let response = app
        .post_json(
            &format!("/api/articles/{}/comments", fixture.article_id),
            &json!({ "content": content, "userId": fixture.reader_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn health_check_is_alive() {
    let (app, _) = spawn_app().await;
    let response = app.get("/check_health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "alive");
}

#[tokio::test]
async fn featured_article_round_trip() {
    let (app, fixture) = spawn_app().await;

    let response = app.get("/api/articles/featured").await;
    assert_eq!(response.status(), StatusCode::OK);
    let featured: Value = response.json().await.unwrap();
    let featured = featured.as_array().unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["id"], json!(fixture.article_id));
    assert_eq!(featured[0]["price"], json!(0.1));
    assert_eq!(featured[0]["category"], json!("Technology"));
    assert_eq!(featured[0]["publication"], json!("Wired"));
    assert_eq!(featured[0]["readTime"], json!(6));
    assert_eq!(
        featured[0]["author"],
        json!({
            "id": fixture.author_id,
            "name": "Wendy Writer",
            "avatarUrl": "https://images.example.com/wendy.png",
            "bio": "Writes things",
            "description": "Technology desk"
        })
    );
    assert!(featured[0]["publishedDate"].as_str().unwrap().contains('T'));

    let response = app
        .get(&format!("/api/articles/{}", fixture.article_id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let article: Value = response.json().await.unwrap();
    assert_eq!(article["title"], featured[0]["title"]);
    assert_eq!(article["price"], json!(0.1));
    assert_eq!(article["comments"], json!([]));
}

#[tokio::test]
async fn list_filters_by_category_and_search() {
    let (app, fixture) = spawn_app().await;

    for query in [
        "?category=technology",
        "?category=TECHNOLOGY",
        "?search=QUANTUM",
    ] {
        let articles: Value = app
            .get(&format!("/api/articles{query}"))
            .await
            .json()
            .await
            .unwrap();
        let ids: Vec<i64> = articles
            .as_array()
            .unwrap()
            .iter()
            .map(|article| article["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![fixture.article_id], "query {query}");
    }

    let articles: Value = app
        .get("/api/articles?category=Tech")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(articles, json!([]));

    let articles: Value = app
        .get("/api/articles?category=Technology&search=gardening")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(articles, json!([]));
}

#[tokio::test]
async fn unknown_and_malformed_article_ids() {
    let (app, fixture) = spawn_app().await;

    let response = app.get("/api/articles/99999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Article not found" }));

    let response = app
        .get(&format!("/api/articles/{}", fixture.orphan_id))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/api/articles/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Invalid article ID" }));
}

#[tokio::test]
async fn comments_are_created_listed_and_liked() {
    let (app, fixture) = spawn_app().await;

    let first = create_comment(&app, &fixture, "First!").await;
    assert_eq!(first["likes"], json!(0));
    assert_eq!(first["articleId"], json!(fixture.article_id));
    assert_eq!(first["userId"], json!(fixture.reader_id));
    let second = create_comment(&app, &fixture, "Second.").await;

    let comments: Value = app
        .get(&format!("/api/articles/{}/comments", fixture.article_id))
        .await
        .json()
        .await
        .unwrap();
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["id"], second["id"]);
    assert_eq!(comments[0]["timeAgo"], json!("0 minutes ago"));
    assert_eq!(
        comments[0]["user"],
        json!({ "id": fixture.reader_id, "name": "Rita Reader", "avatarUrl": "" })
    );

    let like_path = format!("/api/comments/{}/like", first["id"]);
    for expected in 1..=3 {
        let response = app.client.post(app.url(&like_path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let liked: Value = response.json().await.unwrap();
        assert_eq!(liked["likes"], json!(expected));
    }

    let article: Value = app
        .get(&format!("/api/articles/{}", fixture.article_id))
        .await
        .json()
        .await
        .unwrap();
    let stored = article["comments"]
        .as_array()
        .unwrap()
        .iter()
        .find(|comment| comment["id"] == first["id"])
        .unwrap();
    assert_eq!(stored["likes"], json!(3));
}

#[tokio::test]
async fn attributed_likes_count_once() {
    let (app, fixture) = spawn_app().await;
    let comment = create_comment(&app, &fixture, "Like me once").await;
    let like_path = format!("/api/comments/{}/like", comment["id"]);

    for _ in 0..2 {
        let liked: Value = app
            .post_json(&like_path, &json!({ "userId": fixture.reader_id }))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(liked["likes"], json!(1));
    }
}

#[tokio::test]
async fn liking_a_missing_comment_is_404() {
    let (app, _) = spawn_app().await;
    let response = app.post_empty("/api/comments/123/like").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Comment not found" }));

    let response = app.post_empty("/api/comments/x/like").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn comment_validation_and_missing_articles() {
    let (app, fixture) = spawn_app().await;

    let response = app
        .post_json(
            "/api/articles/99999/comments",
            &json!({ "content": "Hello?", "userId": fixture.reader_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Missing article wins over a bad body
    let response = app
        .post_json("/api/articles/99999/comments", &json!({ "nope": true }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_json(
            &format!("/api/articles/{}/comments", fixture.article_id),
            &json!({ "content": "No user" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], json!("Invalid comment data"));
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);

    let comments: Value = app
        .get(&format!("/api/articles/{}/comments", fixture.article_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(comments, json!([]));
}

#[tokio::test]
async fn authors_resolve_or_404() {
    let (app, fixture) = spawn_app().await;

    let author: Value = app
        .get(&format!("/api/authors/{}", fixture.author_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(author["name"], json!("Wendy Writer"));

    let response = app.get("/api/authors/77").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sign_up_creates_users_without_leaking_passwords() {
    let (app, _) = spawn_app().await;
    let request = json!({
        "username": "newreader",
        "password": "s3cret",
        "name": "New Reader",
        "email": "new@example.com"
    });

    let response = app.post_json("/api/users", &request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["id"], json!(3));
    assert_eq!(user["username"], json!("newreader"));
    assert!(user.get("password").is_none());

    let response = app.post_json("/api/users", &request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .post_json(
            "/api/users",
            &json!({ "username": "x", "password": "y", "name": "z", "email": "not-an-email" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/users", &json!({ "username": "x" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let (app, _) = spawn_app().await;
    let response = app.get("/api/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn seeded_sqlite_catalog_serves_articles() {
    let config = Config {
        database_url: Some("sqlite::memory:".to_string()),
        ..Config::default()
    };
    let catalog = init_catalog(&config).await.unwrap();
    let app = spawn_with(catalog).await;

    let featured: Value = app
        .get("/api/articles/featured")
        .await
        .json()
        .await
        .unwrap();
    let featured = featured.as_array().unwrap();
    assert!(!featured.is_empty());
    let dates: Vec<&str> = featured
        .iter()
        .map(|article| article["publishedDate"].as_str().unwrap())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);

    let article_id = featured[0]["id"].as_i64().unwrap();
    let comment = app
        .post_json(
            &format!("/api/articles/{article_id}/comments"),
            &json!({ "content": "Stored in sqlite", "userId": 1 }),
        )
        .await;
    assert_eq!(comment.status(), StatusCode::CREATED);
    let comment: Value = comment.json().await.unwrap();

    let liked: Value = app
        .client
        .post(app.url(&format!("/api/comments/{}/like", comment["id"])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(liked["likes"], json!(1));

    let article: Value = app
        .get(&format!("/api/articles/{article_id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(article["comments"][0]["content"], json!("Stored in sqlite"));
}

async fn reject_unknown_commenter(app: &TestApp, article_id: i64) {
    let path = format!("/api/articles/{article_id}/comments");
    let before: Value = app.get(&path).await.json().await.unwrap();

    let response = app
        .post_json(&path, &json!({ "content": "ghost", "userId": 9999 }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "User not found" }));

    let after: Value = app.get(&path).await.json().await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn comments_from_unknown_users_are_rejected_in_memory() {
    let (app, fixture) = spawn_app().await;
    reject_unknown_commenter(&app, fixture.article_id).await;
}

#[tokio::test]
async fn comments_from_unknown_users_are_rejected_in_sqlite() {
    let config = Config {
        database_url: Some("sqlite::memory:".to_string()),
        ..Config::default()
    };
    let app = spawn_with(init_catalog(&config).await.unwrap()).await;
    reject_unknown_commenter(&app, 1).await;
}
