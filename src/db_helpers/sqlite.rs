use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{
    errors::CatalogError,
    models::{Author, Comment, NewArticle, NewAuthor, NewComment, NewUser, RawArticle, User},
};

use super::{
    article_helpers::{create_article_in_db, get_article_in_db, list_all_articles},
    comment_helpers::{
        add_comment_to_article_in_db, get_comments_for_article_in_db, like_comment_in_db,
    },
    profile_helpers::{get_author_by_id, insert_author},
    user_helpers::{get_user_by_id, get_user_by_username_or_email, insert_user},
    Storage,
};

/// SQLite-backed storage. Foreign keys are enforced by the connection, so
/// authors always resolve to users here.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_user(&self, id: i64) -> Result<Option<User>, CatalogError> {
        Ok(get_user_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, CatalogError> {
        let user = get_user_by_username_or_email(&self.pool, username, email)
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, CatalogError> {
        Ok(insert_user(&self.pool, &user).await?)
    }

    async fn get_author(&self, id: i64) -> Result<Option<Author>, CatalogError> {
        Ok(get_author_by_id(&self.pool, id).await?)
    }

    async fn insert_author(&self, author: NewAuthor) -> Result<Author, CatalogError> {
        Ok(insert_author(&self.pool, &author).await?)
    }

    async fn get_article(&self, id: i64) -> Result<Option<RawArticle>, CatalogError> {
        Ok(get_article_in_db(&self.pool, id).await?)
    }

    async fn list_articles(&self) -> Result<Vec<RawArticle>, CatalogError> {
        Ok(list_all_articles(&self.pool).await?)
    }

    async fn insert_article(&self, article: NewArticle) -> Result<RawArticle, CatalogError> {
        Ok(create_article_in_db(&self.pool, &article).await?)
    }

    async fn comments_for_article(&self, article_id: i64) -> Result<Vec<Comment>, CatalogError> {
        let comments = get_comments_for_article_in_db(&self.pool, article_id)
            .await?;
        Ok(comments)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, CatalogError> {
        let comment = add_comment_to_article_in_db(&self.pool, &comment).await?;
        Ok(comment)
    }

    async fn like_comment(
        &self,
        id: i64,
        liked_by: Option<i64>,
    ) -> Result<Option<Comment>, CatalogError> {
        Ok(like_comment_in_db(&self.pool, id, liked_by).await?)
    }
}
