use serde_json::Value;

use super::{ApiClient, RequestOptions};
use crate::error::ClientError;
use crate::models::{
    EmailRequest, EmailVerifyRequest, LoginResponse, PasswordResetRequest, User, UserCreate,
};

// Public endpoints: no bearer token, and a 401 here means bad credentials,
// not an expired session.
impl ApiClient {
    /// OAuth2 password-grant login; the email goes in the `username` field.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let options = RequestOptions::post()
            .without_auth()
            .form(&[("username", email), ("password", password), ("grant_type", "password")]);
        self.request("/api/auth/login", options).await
    }

    pub async fn register(&self, user: &UserCreate) -> Result<User, ClientError> {
        let options = RequestOptions::post().without_auth().json(user)?;
        self.request("/api/auth/register", options).await
    }

    pub async fn forgot_password(&self, request: &EmailRequest) -> Result<(), ClientError> {
        let options = RequestOptions::post().without_auth().json(request)?;
        self.request::<Value>("/api/auth/forgot-password", options).await?;
        Ok(())
    }

    pub async fn reset_password(&self, request: &PasswordResetRequest) -> Result<(), ClientError> {
        let options = RequestOptions::post().without_auth().json(request)?;
        self.request::<Value>("/api/auth/reset-password", options).await?;
        Ok(())
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), ClientError> {
        let body = EmailVerifyRequest { token: token.to_string() };
        let options = RequestOptions::post().without_auth().json(&body)?;
        self.request::<Value>("/api/auth/verify-email", options).await?;
        Ok(())
    }

    pub async fn resend_verification(&self, request: &EmailRequest) -> Result<(), ClientError> {
        let options = RequestOptions::post().without_auth().json(request)?;
        self.request::<Value>("/api/auth/resend-verification", options).await?;
        Ok(())
    }
}
