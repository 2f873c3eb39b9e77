use std::fmt;

use url::Url;

/// Who may view a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

/// The URL surface of the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    ResetPassword { token: Option<String> },
    VerifyEmail { token: Option<String> },
    UserDashboard,
    UserProfile,
    ChangePassword,
    AccountSecurity,
    Notes,
    NoteDetail { note_id: String },
    Admin,
    UserManagement,
    UserDetail { user_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Unknown route: {0}")]
    Unknown(String),

    #[error("Invalid user id in route: {0}")]
    InvalidUserId(String),
}

impl Route {
    pub fn access(&self) -> Access {
        match self {
            Route::Login
            | Route::Register
            | Route::ForgotPassword
            | Route::ResetPassword { .. }
            | Route::VerifyEmail { .. } => Access::Public,
            Route::UserDashboard
            | Route::UserProfile
            | Route::ChangePassword
            | Route::AccountSecurity
            | Route::Notes
            | Route::NoteDetail { .. } => Access::Authenticated,
            Route::Admin | Route::UserManagement | Route::UserDetail { .. } => Access::Admin,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/auth/login".to_string(),
            Route::Register => "/auth/register".to_string(),
            Route::ForgotPassword => "/auth/forgot-password".to_string(),
            Route::ResetPassword { token } => with_token("/auth/reset-password", token),
            Route::VerifyEmail { token } => with_token("/verify-email", token),
            Route::UserDashboard => "/user/dashboard".to_string(),
            Route::UserProfile => "/user/profile".to_string(),
            Route::ChangePassword => "/user/change-password".to_string(),
            Route::AccountSecurity => "/user/account-security".to_string(),
            Route::Notes => "/user/xhs-notes".to_string(),
            Route::NoteDetail { note_id } => format!("/user/xhs-notes/{}", note_id),
            Route::Admin => "/admin".to_string(),
            Route::UserManagement => "/admin/user-management".to_string(),
            Route::UserDetail { user_id } => format!("/admin/user-detail/{}", user_id),
        }
    }

    /// Parse a path such as `/admin/user-detail/7` or `/verify-email?token=abc`.
    pub fn parse(input: &str) -> Result<Self, RouteError> {
        let base = Url::parse("http://localhost/").map_err(|_| RouteError::Unknown(input.to_string()))?;
        let url = base
            .join(input.trim())
            .map_err(|_| RouteError::Unknown(input.to_string()))?;

        let token = url
            .query_pairs()
            .find(|(k, _)| k == "token")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty());

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let route = match segments.as_slice() {
            ["auth", "login"] => Route::Login,
            ["auth", "register"] => Route::Register,
            ["auth", "forgot-password"] => Route::ForgotPassword,
            ["auth", "reset-password"] | ["reset-password"] => Route::ResetPassword { token },
            ["verify-email"] => Route::VerifyEmail { token },
            ["user", "dashboard"] => Route::UserDashboard,
            ["user", "profile"] => Route::UserProfile,
            ["user", "change-password"] => Route::ChangePassword,
            ["user", "account-security"] => Route::AccountSecurity,
            ["user", "xhs-notes"] => Route::Notes,
            ["user", "xhs-notes", id] => Route::NoteDetail { note_id: id.to_string() },
            ["admin"] => Route::Admin,
            ["admin", "user-management"] => Route::UserManagement,
            ["admin", "user-detail", id] => Route::UserDetail {
                user_id: id
                    .parse()
                    .map_err(|_| RouteError::InvalidUserId(id.to_string()))?,
            },
            _ => return Err(RouteError::Unknown(input.to_string())),
        };

        Ok(route)
    }
}

fn with_token(path: &str, token: &Option<String>) -> String {
    match token {
        Some(token) => {
            let encoded: String = url::form_urlencoded::byte_serialize(token.as_bytes()).collect();
            format!("{}?token={}", path, encoded)
        }
        None => path.to_string(),
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
