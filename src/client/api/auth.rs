//! Authentication endpoints
//!
//! Login sets the session cookie in the client's cookie store; nothing here
//! handles tokens.

use crate::client::api::ApiClient;
use crate::client::error::ClientError;
use crate::shared::models::{RegisterPayload, User, UserLogin};

impl ApiClient {
    /// Login user with username and password
    pub async fn login(&self, credentials: &UserLogin) -> Result<(), ClientError> {
        self.post_unit("/user/login", credentials).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.post_unit("/user/logout", &serde_json::json!({})).await
    }

    /// The logged-in user
    pub async fn get_claims(&self) -> Result<User, ClientError> {
        self.get("/user/claims").await
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<User, ClientError> {
        self.post("/user/register", payload).await
    }
}
