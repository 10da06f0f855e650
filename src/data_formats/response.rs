use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Author, Comment, RawArticle, User};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    pub id: i64,
    pub name: String,
    pub avatar_url: String,
    pub bio: String,
    pub description: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentUser {
    pub id: i64,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithUser {
    pub id: i64,
    pub content: String,
    pub user: CommentUser,
    pub time_ago: String,
    pub likes: i64,
}

/// The resolved article returned by every read endpoint.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: String,
    pub published_date: DateTime<Utc>,
    pub author: AuthorInfo,
    pub category: String,
    pub price: f64,
    pub read_time: i64,
    pub featured: bool,
    pub comments: Vec<CommentWithUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl AuthorInfo {
    pub fn new(Author { id, description, .. }: Author, user: User) -> Self {
        AuthorInfo {
            id,
            name: user.name,
            avatar_url: user.avatar_url.unwrap_or_default(),
            bio: user.bio.unwrap_or_default(),
            description: description.unwrap_or_default(),
        }
    }
}

impl CommentWithUser {
    pub fn new(
        Comment {
            id, content, likes, ..
        }: Comment,
        User {
            id: user_id,
            name,
            avatar_url,
            ..
        }: User,
        time_ago: String,
    ) -> Self {
        CommentWithUser {
            id,
            content,
            user: CommentUser {
                id: user_id,
                name,
                avatar_url: avatar_url.unwrap_or_default(),
            },
            time_ago,
            likes,
        }
    }
}

impl Article {
    pub fn new(
        RawArticle {
            id,
            title,
            excerpt,
            content,
            image_url,
            published_date,
            category,
            price,
            read_time,
            featured,
            publication,
            ..
        }: RawArticle,
        author: AuthorInfo,
        comments: Vec<CommentWithUser>,
    ) -> Self {
        Article {
            id,
            title,
            excerpt,
            content,
            image_url,
            published_date,
            author,
            category,
            price: parse_price(id, &price),
            read_time,
            featured,
            comments,
            publication,
        }
    }
}

impl From<User> for UserResponse {
    fn from(
        User {
            id,
            username,
            name,
            email,
            avatar_url,
            bio,
            ..
        }: User,
    ) -> Self {
        UserResponse {
            id,
            username,
            name,
            email,
            avatar_url,
            bio,
        }
    }
}

fn parse_price(article_id: i64, price: &str) -> f64 {
    match price.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            tracing::warn!(article_id, price, "unparsable article price, serving 0");
            0.0
        }
    }
}
