use async_trait::async_trait;
use serde::Serialize;

use super::{StatusMessage, HISTORY_PAGE_SIZE};
use crate::api::{ApiClient, QueryParams};
use crate::error::ClientError;
use crate::messages;
use crate::models::{ActivityHistory, LoginHistory, User};
use crate::query::{FieldKind, FilterSchema, ListSource, ListView, Page, Pagination, SortDirection};

pub static USER_LIST_SCHEMA: FilterSchema = FilterSchema {
    fields: &[
        ("search", FieldKind::Text),
        ("is_active", FieldKind::Bool),
        ("is_verified", FieldKind::Bool),
        ("is_admin", FieldKind::Bool),
    ],
    sortable: &["created_at", "username", "email", "last_login_at"],
    pagination: Pagination::Offset,
    sort_field_param: "order_by",
    sort_direction_param: "order_direction",
    default_page_size: 10,
    default_sort: Some(("created_at", SortDirection::Desc)),
};

pub struct AdminUsers {
    client: ApiClient,
}

#[async_trait]
impl ListSource for AdminUsers {
    type Item = User;

    async fn fetch(&self, params: QueryParams) -> Result<Page<User>, ClientError> {
        let response = self.client.list_users(params).await?;
        Ok(Page {
            items: response.users,
            total: response.total,
        })
    }
}

pub type UserManagementView = ListView<AdminUsers>;

pub fn user_management(client: ApiClient) -> UserManagementView {
    ListView::new(AdminUsers { client }, &USER_LIST_SCHEMA)
}

/// Headline counts on the admin landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_users: u64,
    pub active_users: u64,
    pub verified_users: u64,
    pub admin_users: u64,
}

impl AdminStats {
    pub async fn load(client: &ApiClient) -> Result<Self, ClientError> {
        let count = move |flag: Option<&'static str>| {
            let mut params = QueryParams::new();
            params.push("limit", 1);
            if let Some(flag) = flag {
                params.push(flag, true);
            }
            client.list_users(params)
        };

        let (all, active, verified, admins) = futures::try_join!(
            count(None),
            count(Some("is_active")),
            count(Some("is_verified")),
            count(Some("is_admin")),
        )?;

        Ok(Self {
            total_users: all.total,
            active_users: active.total,
            verified_users: verified.total,
            admin_users: admins.total,
        })
    }
}

/// One user's record plus paged login and activity history.
pub struct UserDetailView {
    client: ApiClient,
    pub user_id: i64,
    pub user: Option<User>,
    pub login_history: Vec<LoginHistory>,
    pub activity_history: Vec<ActivityHistory>,
    pub history_page: u64,
    pub status: Option<StatusMessage>,
}

impl UserDetailView {
    pub fn new(client: ApiClient, user_id: i64) -> Self {
        Self {
            client,
            user_id,
            user: None,
            login_history: Vec::new(),
            activity_history: Vec::new(),
            history_page: 1,
            status: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.fetch().await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!("Failed to load user {}: {}", self.user_id, e);
                self.status = Some(StatusMessage::error(messages::LOAD_USER_FAILED));
                Err(e)
            }
        }
    }

    async fn fetch(&mut self) -> Result<(), ClientError> {
        let user = self.client.user_detail(self.user_id).await?;
        self.user = Some(user);
        self.load_history().await
    }

    async fn load_history(&mut self) -> Result<(), ClientError> {
        let skip = self.history_page.saturating_sub(1) * HISTORY_PAGE_SIZE;
        let (logins, activities) = futures::try_join!(
            self.client.user_login_history(self.user_id, skip, HISTORY_PAGE_SIZE),
            self.client.user_activity_history(self.user_id, skip, HISTORY_PAGE_SIZE),
        )?;
        self.login_history = logins;
        self.activity_history = activities;
        Ok(())
    }

    pub async fn change_history_page(&mut self, page: u64) -> Result<(), ClientError> {
        if page == 0 {
            return Ok(());
        }
        self.history_page = page;
        self.load_history().await
    }

    pub async fn set_active(&mut self, is_active: bool) -> Result<(), ClientError> {
        match self.client.update_user_status(self.user_id, is_active).await {
            Ok(updated) => {
                self.user = Some(updated);
                let verb = if is_active { "激活" } else { "停用" };
                self.status = Some(StatusMessage::success(format!("用户已{}", verb)));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to update status of user {}: {}", self.user_id, e);
                self.status = Some(StatusMessage::error(messages::USER_STATUS_FAILED));
                Err(e)
            }
        }
    }

    pub async fn set_admin(&mut self, is_admin: bool) -> Result<(), ClientError> {
        match self.client.update_user_role(self.user_id, is_admin).await {
            Ok(updated) => {
                self.user = Some(updated);
                let verb = if is_admin { "设为管理员" } else { "取消管理员权限" };
                self.status = Some(StatusMessage::success(format!("用户已{}", verb)));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to update role of user {}: {}", self.user_id, e);
                self.status = Some(StatusMessage::error(messages::USER_ROLE_FAILED));
                Err(e)
            }
        }
    }
}
