use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::{StatusCode, Uri},
    Extension, Json,
};
use serde_json::Value;

use crate::{
    catalog::ArticleCatalog,
    errors::{CatalogError, RequestError, RequestErrorJson},
    models::Comment,
    Article, ArticleQueryParams, AuthorInfo, CommentRequest, CommentWithUser, JsonResponse,
    LikeRequest, RegisterRequest, UserResponse,
};

type ErrorResponse = JsonResponse<RequestErrorJson>;
type JsonResult<T> = Result<Json<T>, ErrorResponse>;
type CreatedResult<T> = Result<JsonResponse<T>, ErrorResponse>;

fn parse_id(raw: &str, message: &'static str) -> Result<i64, ErrorResponse> {
    raw.parse::<i64>()
        .map_err(|_| RequestError::BadRequest(message).to_json_response())
}

/// `map_err` adapter; `context` is the message clients see on a 500.
fn catalog_error(context: &'static str) -> impl FnOnce(CatalogError) -> ErrorResponse {
    move |error| RequestError::from_catalog(error, context).to_json_response()
}

fn not_found_error(message: &'static str) -> ErrorResponse {
    RequestError::NotFound(message).to_json_response()
}

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

// ----------------- Article Handlers -----------------

pub async fn list_featured_articles(
    Extension(catalog): Extension<Arc<ArticleCatalog>>,
) -> JsonResult<Vec<Article>> {
    let articles = catalog
        .list_featured_articles()
        .await
        .map_err(catalog_error("Failed to fetch featured articles"))?;
    Ok(Json(articles))
}

pub async fn list_articles(
    Extension(catalog): Extension<Arc<ArticleCatalog>>,
    Query(params): Query<ArticleQueryParams>,
) -> JsonResult<Vec<Article>> {
    let articles = catalog
        .list_articles(&params)
        .await
        .map_err(catalog_error("Failed to fetch articles"))?;
    Ok(Json(articles))
}

pub async fn get_article(
    Extension(catalog): Extension<Arc<ArticleCatalog>>,
    Path(id): Path<String>,
) -> JsonResult<Article> {
    let id = parse_id(&id, "Invalid article ID")?;
    let article = catalog
        .get_article(id)
        .await
        .map_err(catalog_error("Failed to fetch article"))?;
    match article {
        Some(article) => Ok(Json(article)),
        None => Err(not_found_error("Article not found")),
    }
}

// ----------------- Comment Handlers -----------------

pub async fn get_comments(
    Extension(catalog): Extension<Arc<ArticleCatalog>>,
    Path(id): Path<String>,
) -> JsonResult<Vec<CommentWithUser>> {
    let id = parse_id(&id, "Invalid article ID")?;
    let comments = catalog
        .list_comments(id)
        .await
        .map_err(catalog_error("Failed to fetch comments"))?;
    Ok(Json(comments))
}

/// The article is looked up before the body is validated, so a bad body on
/// a missing article is a 404 rather than a 400. An unknown `userId` is a 400.
pub async fn add_comment(
    Extension(catalog): Extension<Arc<ArticleCatalog>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> CreatedResult<Comment> {
    let article_id = parse_id(&id, "Invalid article ID")?;
    let article = catalog
        .get_article(article_id)
        .await
        .map_err(catalog_error("Failed to create comment"))?;
    if article.is_none() {
        return Err(not_found_error("Article not found"));
    }

    let request = body
        .map_err(|rejection| rejection.body_text())
        .and_then(|Json(value)| {
            serde_json::from_value::<CommentRequest>(value)
                .map_err(|error| error.to_string())
        })
        .map_err(|error| {
            RequestError::Validation {
                message: "Invalid comment data",
                errors: vec![error],
            }
            .to_json_response()
        })?;

    let comment = catalog
        .create_comment(article_id, request.user_id, request.content)
        .await
        .map_err(catalog_error("Failed to create comment"))?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// An optional `{"userId": n}` body makes the like count once per user.
pub async fn like_comment(
    Extension(catalog): Extension<Arc<ArticleCatalog>>,
    Path(id): Path<String>,
    body: Option<Json<LikeRequest>>,
) -> JsonResult<Comment> {
    let id = parse_id(&id, "Invalid comment ID")?;
    let liked_by = body.and_then(|Json(request)| request.user_id);
    let comment = match liked_by {
        Some(user_id) => catalog.like_comment_as(id, user_id).await,
        None => catalog.like_comment(id).await,
    }
    .map_err(catalog_error("Failed to like comment"))?;
    match comment {
        Some(comment) => Ok(Json(comment)),
        None => Err(not_found_error("Comment not found")),
    }
}

// ----------------- Author Handlers -----------------

pub async fn get_author(
    Extension(catalog): Extension<Arc<ArticleCatalog>>,
    Path(id): Path<String>,
) -> JsonResult<AuthorInfo> {
    let id = parse_id(&id, "Invalid author ID")?;
    let author = catalog
        .get_author(id)
        .await
        .map_err(catalog_error("Failed to fetch author"))?;
    match author {
        Some(author) => Ok(Json(author)),
        None => Err(not_found_error("Author not found")),
    }
}

// ----------------- User Handlers -----------------

pub async fn register_user(
    Extension(catalog): Extension<Arc<ArticleCatalog>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> CreatedResult<UserResponse> {
    let Json(request) = body.map_err(|rejection| {
        RequestError::Validation {
            message: "Invalid user data",
            errors: vec![rejection.body_text()],
        }
        .to_json_response()
    })?;
    if let Err(errors) = request.validate() {
        return Err(RequestError::Validation {
            message: "Invalid user data",
            errors,
        }
        .to_json_response());
    }

    let user = catalog
        .create_user(request)
        .await
        .map_err(catalog_error("Failed to create user"))?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
