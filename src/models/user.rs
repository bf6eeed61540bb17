//! User model

use serde::{Deserialize, Serialize};

/// A registered player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Database ID
    pub id: i64,
    /// Email address (unique, used for login)
    pub email: String,
    /// Display name (unique)
    pub username: String,
    /// Password hash (never serialized)
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Registration timestamp (unix seconds)
    #[serde(default)]
    pub created_at: i64,
}

impl User {
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        Self {
            id: 0,
            email,
            username,
            password: password_hash,
            created_at: 0,
        }
    }

    /// Public view for API responses
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

/// User info safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_never_serialized() {
        let user = User::new(
            "test@example.com".to_string(),
            "testuser".to_string(),
            "deadbeef".to_string(),
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("password"));
    }
}
