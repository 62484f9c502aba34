//! User Data Structures

use crate::shared::models::datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The logged-in user as returned by the claims endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub email: String,
    #[serde(default, with = "datetime::optional")]
    pub registered_date: Option<DateTime<Utc>>,
    pub timezone: String,
}

/// Public subset of a user embedded in board members and activities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserBasicInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub username: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl UserBasicInfo {
    /// Name to show for this user: the display name when set, else the username
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLogin {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

/// Registration request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub timezone: String,
}
