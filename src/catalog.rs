use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};

use crate::{
    data_formats::{Article, ArticleQueryParams, AuthorInfo, CommentWithUser, RegisterRequest},
    db_helpers::Storage,
    errors::CatalogError,
    models::{Comment, NewComment, NewUser, RawArticle, User},
    password::hash_password_argon2,
};

/// Read and write operations over articles, authors, users and comments.
///
/// Every article handed out is fully resolved: an article whose author (or
/// the author's user) cannot be found is treated as if it did not exist.
/// Comment authors are resolved the same way.
#[derive(Clone)]
pub struct ArticleCatalog {
    storage: Arc<dyn Storage>,
}

impl ArticleCatalog {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub async fn get_article(&self, id: i64) -> Result<Option<Article>, CatalogError> {
        let raw = match self.storage.get_article(id).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let author = match self.resolve_author(raw.author_id).await? {
            Some(author) => author,
            None => {
                tracing::debug!(
                    article_id = id,
                    author_id = raw.author_id,
                    "author did not resolve"
                );
                return Ok(None);
            }
        };
        let comments = self.resolve_comments(raw.id, Utc::now()).await?;
        Ok(Some(Article::new(raw, author, comments)))
    }

    pub async fn list_articles(
        &self,
        params: &ArticleQueryParams,
    ) -> Result<Vec<Article>, CatalogError> {
        let category = params.category().map(str::to_lowercase);
        let search = params.search().map(str::to_lowercase);

        let articles = self.storage.list_articles().await?;
        let articles = articles
            .into_iter()
            .filter(|article| match &category {
                Some(category) => article.category.to_lowercase() == *category,
                None => true,
            })
            .filter(|article| match &search {
                Some(search) => matches_search(article, search),
                None => true,
            })
            .collect();
        self.assemble(articles).await
    }

    pub async fn list_featured_articles(&self) -> Result<Vec<Article>, CatalogError> {
        let articles = self
            .storage
            .list_articles()
            .await?
            .into_iter()
            .filter(|article| article.featured)
            .collect();
        self.assemble(articles).await
    }

    /// Comments for an article, newest first. Unknown articles have none.
    pub async fn list_comments(
        &self,
        article_id: i64,
    ) -> Result<Vec<CommentWithUser>, CatalogError> {
        self.resolve_comments(article_id, Utc::now()).await
    }

    /// Stores a new comment. Fails with [`CatalogError::ArticleNotFound`]
    /// unless the article exists and its author resolves, then with
    /// [`CatalogError::UserNotFound`] unless the commenter exists.
    pub async fn create_comment(
        &self,
        article_id: i64,
        user_id: i64,
        content: String,
    ) -> Result<Comment, CatalogError> {
        let article = match self.storage.get_article(article_id).await? {
            Some(article) => article,
            None => return Err(CatalogError::ArticleNotFound),
        };
        if self.resolve_author(article.author_id).await?.is_none() {
            return Err(CatalogError::ArticleNotFound);
        }
        if self.storage.get_user(user_id).await?.is_none() {
            return Err(CatalogError::UserNotFound);
        }

        let comment = self
            .storage
            .insert_comment(NewComment {
                article_id,
                user_id,
                content,
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(
            comment_id = comment.id,
            article_id,
            user_id,
            "comment created"
        );
        Ok(comment)
    }

    /// Adds one like. Not idempotent: every call counts.
    pub async fn like_comment(&self, id: i64) -> Result<Option<Comment>, CatalogError> {
        self.storage.like_comment(id, None).await
    }

    /// Adds a like attributed to `user_id`; a user's repeat likes are ignored.
    pub async fn like_comment_as(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Comment>, CatalogError> {
        self.storage.like_comment(id, Some(user_id)).await
    }

    pub async fn get_author(&self, id: i64) -> Result<Option<AuthorInfo>, CatalogError> {
        self.resolve_author(id).await
    }

    /// Registers a user. Username and email are unique, case-insensitively.
    pub async fn create_user(&self, request: RegisterRequest) -> Result<User, CatalogError> {
        let RegisterRequest {
            username,
            password,
            name,
            email,
            avatar_url,
            bio,
        } = request;

        if let Some(existing) = self
            .storage
            .find_user_by_username_or_email(&username, &email)
            .await?
        {
            let message = if existing.username.eq_ignore_ascii_case(&username) {
                "Username already exists"
            } else {
                "Email already exists"
            };
            return Err(CatalogError::Conflict(message.to_string()));
        }

        let password = hash_password_argon2(password)
            .await
            .map_err(|e| CatalogError::Hashing(e.to_string()))?;
        let user = self
            .storage
            .insert_user(NewUser {
                username,
                password,
                name,
                email,
                avatar_url,
                bio,
            })
            .await?;
        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    // ----------------- Resolution -----------------

    async fn resolve_author(&self, author_id: i64) -> Result<Option<AuthorInfo>, CatalogError> {
        let author = match self.storage.get_author(author_id).await? {
            Some(author) => author,
            None => return Ok(None),
        };
        let user = match self.storage.get_user(author.user_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };
        Ok(Some(AuthorInfo::new(author, user)))
    }

    async fn resolve_comments(
        &self,
        article_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<CommentWithUser>, CatalogError> {
        let mut comments = self.storage.comments_for_article(article_id).await?;
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut users: HashMap<i64, Option<User>> = HashMap::new();
        let mut resolved = Vec::with_capacity(comments.len());
        for comment in comments {
            let user = match users.get(&comment.user_id) {
                Some(user) => user.clone(),
                None => {
                    let user = self.storage.get_user(comment.user_id).await?;
                    users.insert(comment.user_id, user.clone());
                    user
                }
            };
            let user = match user {
                Some(user) => user,
                None => continue,
            };
            let time_ago = time_ago(comment.created_at, now);
            resolved.push(CommentWithUser::new(comment, user, time_ago));
        }
        Ok(resolved)
    }

    /// Sorts newest first, resolves authors (dropping the unresolvable) and
    /// attaches comments.
    async fn assemble(&self, mut articles: Vec<RawArticle>) -> Result<Vec<Article>, CatalogError> {
        articles.sort_by(|a, b| b.published_date.cmp(&a.published_date));

        let now = Utc::now();
        let mut authors: HashMap<i64, Option<AuthorInfo>> = HashMap::new();
        let mut result = Vec::with_capacity(articles.len());
        for raw in articles {
            let author = match authors.get(&raw.author_id) {
                Some(author) => author.clone(),
                None => {
                    let author = self.resolve_author(raw.author_id).await?;
                    authors.insert(raw.author_id, author.clone());
                    author
                }
            };
            let author = match author {
                Some(author) => author,
                None => {
                    tracing::debug!(
                        article_id = raw.id,
                        author_id = raw.author_id,
                        "dropping article with unresolved author"
                    );
                    continue;
                }
            };
            let comments = self.resolve_comments(raw.id, now).await?;
            result.push(Article::new(raw, author, comments));
        }
        Ok(result)
    }
}

fn matches_search(article: &RawArticle, search: &str) -> bool {
    article.title.to_lowercase().contains(search)
        || article.excerpt.to_lowercase().contains(search)
        || article.content.to_lowercase().contains(search)
}

/// Human readable age of `created_at` as seen at `now`, in whole days, hours
/// or minutes. Timestamps in the future read as "0 minutes ago".
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let days = elapsed.num_days();
    if days >= 1 {
        return plural(days, "day");
    }
    let hours = elapsed.num_hours();
    if hours >= 1 {
        return plural(hours, "hour");
    }
    plural(elapsed.num_minutes().max(0), "minute")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
