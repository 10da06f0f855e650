use sqlx::SqlitePool;

use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, username, password, name, email, avatar_url, bio";

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let user = sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn get_user_by_username_or_email(
    pool: &SqlitePool,
    username: &str,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        "SELECT {USER_COLUMNS} FROM users
         WHERE username = $1 COLLATE NOCASE OR email = $2 COLLATE NOCASE
         ORDER BY id
         LIMIT 1"
    );
    let user = sqlx::query_as::<_, User>(&query)
        .bind(username)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> Result<User, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let query = format!(
        "INSERT INTO users (username, password, name, email, avatar_url, bio)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&query)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.avatar_url)
        .bind(&user.bio)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(user)
}
