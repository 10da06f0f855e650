use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::CatalogError,
    models::{Author, Comment, NewArticle, NewAuthor, NewComment, NewUser, RawArticle, User},
};

use super::Storage;

/// Process-lifetime storage. Maps are keyed by id so iteration follows
/// insertion order.
#[derive(Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    authors: BTreeMap<i64, Author>,
    articles: BTreeMap<i64, RawArticle>,
    comments: BTreeMap<i64, Comment>,
    comment_likes: HashSet<(i64, i64)>,
    last_user_id: i64,
    last_author_id: i64,
    last_article_id: i64,
    last_comment_id: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: i64) -> Result<Option<User>, CatalogError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, CatalogError> {
        let tables = self.tables.read().await;
        let user = tables.users.values().find(|user| {
            user.username.eq_ignore_ascii_case(username) || user.email.eq_ignore_ascii_case(email)
        });
        Ok(user.cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, CatalogError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.last_user_id);
        let user = User {
            id,
            username: user.username,
            password: user.password,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
            bio: user.bio,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_author(&self, id: i64) -> Result<Option<Author>, CatalogError> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn insert_author(&self, author: NewAuthor) -> Result<Author, CatalogError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.last_author_id);
        let author = Author {
            id,
            user_id: author.user_id,
            description: author.description,
            followers: Some(0),
        };
        tables.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn get_article(&self, id: i64) -> Result<Option<RawArticle>, CatalogError> {
        Ok(self.tables.read().await.articles.get(&id).cloned())
    }

    async fn list_articles(&self) -> Result<Vec<RawArticle>, CatalogError> {
        let tables = self.tables.read().await;
        Ok(tables.articles.values().cloned().collect())
    }

    async fn insert_article(&self, article: NewArticle) -> Result<RawArticle, CatalogError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.last_article_id);
        let article = RawArticle {
            id,
            title: article.title,
            excerpt: article.excerpt,
            content: article.content,
            image_url: article.image_url,
            published_date: article.published_date,
            author_id: article.author_id,
            category: article.category,
            price: article.price,
            read_time: article.read_time,
            featured: article.featured,
            publication: article.publication,
        };
        tables.articles.insert(id, article.clone());
        Ok(article)
    }

    async fn comments_for_article(&self, article_id: i64) -> Result<Vec<Comment>, CatalogError> {
        let tables = self.tables.read().await;
        let comments = tables
            .comments
            .values()
            .filter(|comment| comment.article_id == article_id)
            .cloned()
            .collect();
        Ok(comments)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, CatalogError> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.last_comment_id);
        let comment = Comment {
            id,
            content: comment.content,
            article_id: comment.article_id,
            user_id: comment.user_id,
            created_at: comment.created_at,
            likes: 0,
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn like_comment(
        &self,
        id: i64,
        liked_by: Option<i64>,
    ) -> Result<Option<Comment>, CatalogError> {
        let mut tables = self.tables.write().await;
        let Tables {
            comments,
            comment_likes,
            ..
        } = &mut *tables;

        let comment = match comments.get_mut(&id) {
            Some(comment) => comment,
            None => return Ok(None),
        };
        if let Some(user_id) = liked_by {
            if !comment_likes.insert((id, user_id)) {
                return Ok(Some(comment.clone()));
            }
        }
        comment.likes += 1;
        Ok(Some(comment.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_helpers::test_support::exercise_storage;

    #[tokio::test]
    async fn satisfies_storage_contract() {
        exercise_storage(&MemStorage::new()).await;
    }

    #[tokio::test]
    async fn authors_may_point_at_missing_users() {
        let storage = MemStorage::new();
        let author = storage
            .insert_author(NewAuthor {
                user_id: 404,
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(author.user_id, 404);
        assert!(storage.get_user(404).await.unwrap().is_none());
    }
}
