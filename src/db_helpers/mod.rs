use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool,
};

use crate::{
    errors::CatalogError,
    models::{Author, Comment, NewArticle, NewAuthor, NewComment, NewUser, RawArticle, User},
};

mod article_helpers;
mod comment_helpers;
mod memory;
mod profile_helpers;
mod sqlite;
mod user_helpers;

pub use memory::MemStorage;
pub use sqlite::SqliteStorage;

/// Record-level access to users, authors, articles and comments.
///
/// Implementations assign ids themselves, per entity, starting at 1 and
/// never reused. Lookups of missing ids return `Ok(None)`. Listing methods
/// return records in insertion (id) order; ordering for display is the
/// catalog's job.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<User>, CatalogError>;

    /// Case-insensitive match on either field.
    async fn find_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, CatalogError>;

    async fn insert_user(&self, user: NewUser) -> Result<User, CatalogError>;

    async fn get_author(&self, id: i64) -> Result<Option<Author>, CatalogError>;

    async fn insert_author(&self, author: NewAuthor) -> Result<Author, CatalogError>;

    async fn get_article(&self, id: i64) -> Result<Option<RawArticle>, CatalogError>;

    async fn list_articles(&self) -> Result<Vec<RawArticle>, CatalogError>;

    async fn insert_article(&self, article: NewArticle) -> Result<RawArticle, CatalogError>;

    async fn comments_for_article(&self, article_id: i64) -> Result<Vec<Comment>, CatalogError>;

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, CatalogError>;

    /// Adds one like to a comment. With `liked_by` set, a repeat like from the
    /// same user leaves the counter alone and returns the comment as is.
    async fn like_comment(
        &self,
        id: i64,
        liked_by: Option<i64>,
    ) -> Result<Option<Comment>, CatalogError>;
}

/// How long a connection waits on another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    let in_memory = db_url.contains(":memory:");
    if !in_memory && !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!(%db_url, "creating database");
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {db_url}"))?;
    }

    // Every connection to `:memory:` is its own database, so pin a single
    // connection for the lifetime of the pool.
    let options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
    };
    let connect_options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("Invalid database url {db_url}"))?
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = options
        .connect_with(connect_options)
        .await
        .with_context(|| format!("Failed to connect to {db_url}"))?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    tracing::debug!("running migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    tracing::debug!("migrations completed");
    Ok(())
}
