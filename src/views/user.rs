use serde::Serialize;

use super::{StatusMessage, HISTORY_PAGE_SIZE};
use crate::error::ClientError;
use crate::messages;
use crate::models::{ActivityHistory, LoginHistory, User, UserPassword, UserUpdate};
use crate::session::Session;
use crate::validation::{FieldErrors, Validator};

const DASHBOARD_RECENT: u64 = 5;

/// Landing page for signed-in users.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub user: User,
    pub recent_logins: Vec<LoginHistory>,
    pub recent_activity: Vec<ActivityHistory>,
}

impl Dashboard {
    pub async fn load(session: &Session) -> Result<Self, ClientError> {
        let client = session.client();
        let (user, recent_logins, recent_activity) = futures::try_join!(
            client.fetch_current_user(),
            client.login_history(0, DASHBOARD_RECENT),
            client.activity_history(0, DASHBOARD_RECENT),
        )?;
        Ok(Self {
            user,
            recent_logins,
            recent_activity,
        })
    }
}

/// Edit username, avatar and bio, then re-sync the session user.
pub async fn update_profile(session: &Session, update: &UserUpdate) -> Result<User, ClientError> {
    if update.is_empty() {
        return Err(ClientError::InvalidRequest("nothing to update".to_string()));
    }
    if let Some(username) = &update.username {
        Validator::new()
            .required("username", username, messages::REQUIRED_USERNAME)
            .finish()?;
    }

    session.client().update_current_user(update).await.map_err(|e| {
        tracing::error!("Profile update failed: {}", e);
        e
    })?;
    session.refresh_user().await
}

#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("old_password", &self.old_password, messages::REQUIRED_CURRENT_PASSWORD)
            .password("new_password", &self.new_password, messages::REQUIRED_NEW_PASSWORD)
            .required("confirm_password", &self.confirm_password, messages::REQUIRED_CONFIRM_PASSWORD)
            .confirmation("confirm_password", &self.new_password, &self.confirm_password)
            .finish()
    }

    /// Nothing is sent unless local validation passes. Backend rejections
    /// come back as field errors.
    pub async fn submit(&self, session: &Session) -> Result<StatusMessage, FieldErrors> {
        self.validate()?;

        let passwords = UserPassword {
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        };
        match session.client().change_password(&passwords).await {
            Ok(()) => Ok(StatusMessage::success(messages::PASSWORD_CHANGED)),
            Err(e) => Err(password_errors(&e)),
        }
    }
}

fn password_errors(error: &ClientError) -> FieldErrors {
    if error.detail().to_lowercase().contains("incorrect password") {
        FieldErrors::single("old_password", messages::WRONG_PASSWORD)
    } else {
        tracing::error!("Password change failed: {}", error);
        FieldErrors::single("general", messages::CHANGE_PASSWORD_FAILED)
    }
}

/// The signed-in user's login history.
pub struct AccountSecurity {
    pub page: u64,
    pub logins: Vec<LoginHistory>,
}

impl AccountSecurity {
    pub fn new() -> Self {
        Self {
            page: 1,
            logins: Vec::new(),
        }
    }

    pub async fn load(&mut self, session: &Session, page: u64) -> Result<(), ClientError> {
        let page = page.max(1);
        let skip = (page - 1) * HISTORY_PAGE_SIZE;
        self.logins = session.client().login_history(skip, HISTORY_PAGE_SIZE).await?;
        self.page = page;
        Ok(())
    }

    /// The backend does not report a total; a short page is the last one.
    pub fn has_next_page(&self) -> bool {
        self.logins.len() as u64 == HISTORY_PAGE_SIZE
    }
}

impl Default for AccountSecurity {
    fn default() -> Self {
        Self::new()
    }
}
