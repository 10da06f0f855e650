use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub user_id: i64,
    pub description: Option<String>,
    pub followers: Option<i64>,
}

/// Article row as stored. Never returned to callers directly; see
/// [`crate::Article`] for the resolved view.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: String,
    pub published_date: DateTime<Utc>,
    pub author_id: i64,
    pub category: String,
    pub price: String,
    pub read_time: i64,
    pub featured: bool,
    pub publication: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub article_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
}

// ----------------- Insert Records -----------------

/// `password` must already be hashed by the time it reaches storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub user_id: i64,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: String,
    pub published_date: DateTime<Utc>,
    pub author_id: i64,
    pub category: String,
    pub price: String,
    pub read_time: i64,
    pub featured: bool,
    pub publication: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub article_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
