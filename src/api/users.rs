use serde_json::Value;

use super::{ApiClient, QueryParams, RequestOptions};
use crate::error::ClientError;
use crate::models::{ActivityHistory, LoginHistory, User, UserPassword, UserUpdate};

impl ApiClient {
    pub async fn fetch_current_user(&self) -> Result<User, ClientError> {
        self.request_guarded("/api/users/me", RequestOptions::get()).await
    }

    pub async fn update_current_user(&self, update: &UserUpdate) -> Result<User, ClientError> {
        let options = RequestOptions::put().json(update)?;
        self.request_guarded("/api/users/me", options).await
    }

    pub async fn change_password(&self, passwords: &UserPassword) -> Result<(), ClientError> {
        let options = RequestOptions::put().json(passwords)?;
        self.request_guarded::<Value>("/api/users/me/password", options).await?;
        Ok(())
    }

    pub async fn login_history(&self, skip: u64, limit: u64) -> Result<Vec<LoginHistory>, ClientError> {
        let options = RequestOptions::get().query(window(skip, limit));
        self.request_guarded("/api/users/me/login-history", options).await
    }

    pub async fn activity_history(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ActivityHistory>, ClientError> {
        let options = RequestOptions::get().query(window(skip, limit));
        self.request_guarded("/api/users/me/activity-history", options).await
    }
}

pub(super) fn window(skip: u64, limit: u64) -> QueryParams {
    // skip=0 must still be sent
    let mut params = QueryParams::new();
    params.push("skip", skip).push("limit", limit);
    params
}
