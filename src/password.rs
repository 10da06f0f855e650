use anyhow::{Context, Result};
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;

pub async fn hash_password_argon2(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}

#[cfg(test)]
pub(crate) async fn verify_password_argon2(password: String, hash: &str) -> Result<bool> {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Failed to verify password"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}
