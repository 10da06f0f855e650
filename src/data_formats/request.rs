use serde::{Deserialize, Serialize};

// ----------------- Comment Request -----------------
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: String,
    pub user_id: i64,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LikeRequest {
    pub user_id: Option<i64>,
}

// ----------------- User Request -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl RegisterRequest {
    /// Shape checks beyond what deserialization enforces. Returns every
    /// problem found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("username must not be empty".to_string());
        }
        if self.password.is_empty() {
            errors.push("password must not be empty".to_string());
        }
        if self.name.trim().is_empty() {
            errors.push("name must not be empty".to_string());
        }
        if !self.email.contains('@') {
            errors.push("email must be a valid address".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
