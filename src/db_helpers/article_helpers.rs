use sqlx::SqlitePool;

use crate::models::{NewArticle, RawArticle};

const ARTICLE_COLUMNS: &str = r#"
    id, title, excerpt, content, image_url, published_date,
    author_id, category, price, read_time, featured, publication
"#;

pub async fn get_article_in_db(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<RawArticle>, sqlx::Error> {
    let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
    let article = sqlx::query_as::<_, RawArticle>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(article)
}

pub async fn list_all_articles(pool: &SqlitePool) -> Result<Vec<RawArticle>, sqlx::Error> {
    let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY id");
    let articles = sqlx::query_as::<_, RawArticle>(&query)
        .fetch_all(pool)
        .await?;
    Ok(articles)
}

pub async fn create_article_in_db(
    pool: &SqlitePool,
    article: &NewArticle,
) -> Result<RawArticle, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let query = format!(
        r#"
        INSERT INTO articles (title, excerpt, content, image_url, published_date,
                              author_id, category, price, read_time, featured, publication)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {ARTICLE_COLUMNS}
        "#
    );
    let article = sqlx::query_as::<_, RawArticle>(&query)
        .bind(&article.title)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(&article.image_url)
        .bind(article.published_date)
        .bind(article.author_id)
        .bind(&article.category)
        .bind(&article.price)
        .bind(article.read_time)
        .bind(article.featured)
        .bind(&article.publication)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(article)
}
