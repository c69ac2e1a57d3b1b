use serde_json::Value;

use shelfline_auth::{LoginRequest, RegisterRequest, TokenResponse, UserProfile};

use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(&self, req: &LoginRequest) -> Result<TokenResponse, ClientError> {
        self.post("/auth/login", req).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, req: &RegisterRequest) -> Result<UserProfile, ClientError> {
        self.post("/auth/register", req).await
    }

    /// `POST /auth/verify`: resolves the current token to its user.
    pub async fn verify(&self) -> Result<UserProfile, ClientError> {
        self.post_empty("/auth/verify").await
    }

    /// `POST /auth/logout`
    pub async fn logout(&self) -> Result<(), ClientError> {
        let _: Option<Value> = self.post_empty("/auth/logout").await?;
        Ok(())
    }
}
