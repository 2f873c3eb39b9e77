use serde_json::json;

use super::users::window;
use super::{ApiClient, QueryParams, RequestOptions};
use crate::error::ClientError;
use crate::models::{ActivityHistory, LoginHistory, User, UserListResponse, UserUpdate};

impl ApiClient {
    pub async fn list_users(&self, params: QueryParams) -> Result<UserListResponse, ClientError> {
        let options = RequestOptions::get().query(params);
        self.request_guarded("/api/admin/users", options).await
    }

    pub async fn user_detail(&self, user_id: i64) -> Result<User, ClientError> {
        self.request_guarded(&format!("/api/admin/users/{}", user_id), RequestOptions::get())
            .await
    }

    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<User, ClientError> {
        let options = RequestOptions::put().json(update)?;
        self.request_guarded(&format!("/api/admin/users/{}", user_id), options)
            .await
    }

    pub async fn update_user_status(&self, user_id: i64, is_active: bool) -> Result<User, ClientError> {
        let options = RequestOptions::put().json(&json!({ "is_active": is_active }))?;
        self.request_guarded(&format!("/api/admin/users/{}/status", user_id), options)
            .await
    }

    pub async fn update_user_role(&self, user_id: i64, is_admin: bool) -> Result<User, ClientError> {
        let options = RequestOptions::put().json(&json!({ "is_admin": is_admin }))?;
        self.request_guarded(&format!("/api/admin/users/{}/role", user_id), options)
            .await
    }

    pub async fn user_login_history(
        &self,
        user_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<LoginHistory>, ClientError> {
        let options = RequestOptions::get().query(window(skip, limit));
        self.request_guarded(&format!("/api/admin/users/{}/login-history", user_id), options)
            .await
    }

    pub async fn user_activity_history(
        &self,
        user_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ActivityHistory>, ClientError> {
        let options = RequestOptions::get().query(window(skip, limit));
        self.request_guarded(&format!("/api/admin/users/{}/activity-history", user_id), options)
            .await
    }
}
