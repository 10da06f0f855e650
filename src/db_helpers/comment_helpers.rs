use sqlx::SqlitePool;

use crate::models::{Comment, NewComment};

const COMMENT_COLUMNS: &str = "id, content, article_id, user_id, created_at, likes";

pub async fn get_comments_for_article_in_db(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    let query =
        format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE article_id = $1 ORDER BY id");
    let comments = sqlx::query_as::<_, Comment>(&query)
        .bind(article_id)
        .fetch_all(pool)
        .await?;
    Ok(comments)
}

pub async fn add_comment_to_article_in_db(
    pool: &SqlitePool,
    comment: &NewComment,
) -> Result<Comment, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let query = format!(
        "INSERT INTO comments (content, article_id, user_id, created_at, likes)
         VALUES ($1, $2, $3, $4, 0)
         RETURNING {COMMENT_COLUMNS}"
    );
    let comment = sqlx::query_as::<_, Comment>(&query)
        .bind(&comment.content)
        .bind(comment.article_id)
        .bind(comment.user_id)
        .bind(comment.created_at)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(comment)
}

/// Every statement that can run first in the transaction is a write, so the
/// connection takes the write lock straight away and waits out the busy
/// timeout instead of failing on a read-to-write upgrade.
pub async fn like_comment_in_db(
    pool: &SqlitePool,
    id: i64,
    liked_by: Option<i64>,
) -> Result<Option<Comment>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if let Some(user_id) = liked_by {
        // Selecting from comments keeps likes of missing comments out of the table
        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO comment_likes (comment_id, user_id)
            SELECT id, $2 FROM comments WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut tx)
        .await?
        .rows_affected();
        if inserted == 0 {
            let select = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
            let current = sqlx::query_as::<_, Comment>(&select)
                .bind(id)
                .fetch_optional(&mut tx)
                .await?;
            tx.commit().await?;
            return Ok(current);
        }
    }

    let update = format!(
        "UPDATE comments SET likes = likes + 1 WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
    );
    let comment = sqlx::query_as::<_, Comment>(&update)
        .bind(id)
        .fetch_optional(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(comment)
}
