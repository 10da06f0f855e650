use sqlx::SqlitePool;

use crate::models::{Author, NewAuthor};

pub async fn get_author_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Author>, sqlx::Error> {
    let author = sqlx::query_as::<_, Author>(
        r#"
        SELECT id, user_id, description, followers FROM authors WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(author)
}

pub async fn insert_author(pool: &SqlitePool, author: &NewAuthor) -> Result<Author, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let author = sqlx::query_as::<_, Author>(
        r#"
        INSERT INTO authors (user_id, description, followers)
        VALUES ($1, $2, 0)
        RETURNING id, user_id, description, followers
        "#,
    )
    .bind(author.user_id)
    .bind(&author.description)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(author)
}
