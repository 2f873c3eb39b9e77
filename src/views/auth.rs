use super::StatusMessage;
use crate::api::ApiClient;
use crate::error::{ClientError, ErrorKind};
use crate::messages;
use crate::models::{EmailRequest, LoginResponse, PasswordResetRequest, User, UserCreate};
use crate::navigation::NavigationMode;
use crate::routes::Route;
use crate::session::Session;
use crate::validation::{FieldErrors, Validator};

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .email("email", &self.email)
            .required("password", &self.password, messages::REQUIRED_PASSWORD)
            .finish()
    }

    /// An inactive account still signs in but is reported back as an error.
    pub async fn submit(&self, session: &Session) -> Result<LoginResponse, FieldErrors> {
        self.validate()?;

        let response = session
            .login(self.email.trim(), &self.password)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::SessionExpired | ErrorKind::Rejected => {
                    FieldErrors::single("general", messages::LOGIN_FAILED)
                }
                _ => FieldErrors::single("general", e.user_message()),
            })?;

        if !response.user.is_active {
            return Err(FieldErrors::single("general", messages::ACCOUNT_DEACTIVATED));
        }
        Ok(response)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        Validator::new()
            .required("username", &self.username, messages::REQUIRED_USERNAME)
            .email("email", &self.email)
            .password("password", &self.password, messages::REQUIRED_PASSWORD)
            .required("confirm_password", &self.confirm_password, messages::REQUIRED_CONFIRM_PASSWORD)
            .confirmation("confirm_password", &self.password, &self.confirm_password)
            .finish()
    }

    /// On success the viewer is sent to the login page.
    pub async fn submit(&self, client: &ApiClient) -> Result<User, FieldErrors> {
        self.validate()?;

        let user = UserCreate {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        };
        let created = client.register(&user).await.map_err(|e| register_errors(&e))?;
        client.navigator().navigate(Route::Login, NavigationMode::Push);
        Ok(created)
    }
}

fn register_errors(error: &ClientError) -> FieldErrors {
    let detail = error.detail();
    if detail.contains("already registered") {
        FieldErrors::single("email", messages::EMAIL_EXISTS)
    } else if detail.contains("username already exists") {
        FieldErrors::single("username", messages::USERNAME_TAKEN)
    } else {
        tracing::error!("Registration failed: {}", error);
        FieldErrors::single("general", messages::REGISTER_FAILED)
    }
}

pub async fn forgot_password(
    client: &ApiClient,
    email: &str,
    frontend_url: Option<&str>,
) -> Result<StatusMessage, FieldErrors> {
    Validator::new().email("email", email).finish()?;

    let request = EmailRequest {
        email: email.trim().to_string(),
        frontend_url: frontend_url.map(str::to_string),
    };
    match client.forgot_password(&request).await {
        Ok(()) => Ok(StatusMessage::success(messages::RESET_EMAIL_SENT)),
        Err(e) => {
            tracing::error!("Forgot-password request failed: {}", e);
            Err(FieldErrors::single("general", messages::FORGOT_PASSWORD_FAILED))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub token: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// Read the token from a `/auth/reset-password?token=` route.
    pub fn from_route(route: &Route) -> Self {
        let token = match route {
            Route::ResetPassword { token } => token.clone(),
            _ => None,
        };
        Self {
            token,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<&str, FieldErrors> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| FieldErrors::single("general", messages::INVALID_RESET_LINK))?;

        Validator::new()
            .password("new_password", &self.new_password, messages::REQUIRED_NEW_PASSWORD)
            .confirmation("confirm_password", &self.new_password, &self.confirm_password)
            .finish()?;
        Ok(token)
    }

    pub async fn submit(&self, client: &ApiClient) -> Result<StatusMessage, FieldErrors> {
        let token = self.validate()?;

        let request = PasswordResetRequest {
            token: token.to_string(),
            new_password: self.new_password.clone(),
        };
        match client.reset_password(&request).await {
            Ok(()) => {
                client.navigator().navigate(Route::Login, NavigationMode::Push);
                Ok(StatusMessage::success(messages::RESET_SUCCESS))
            }
            Err(e) => {
                tracing::error!("Password reset failed: {}", e);
                Err(FieldErrors::single("general", messages::RESET_FAILED))
            }
        }
    }
}

/// Outcome of the verify-email page; never an `Err`, the page only shows a banner.
pub async fn verify_email(client: &ApiClient, token: Option<&str>) -> StatusMessage {
    let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => return StatusMessage::error(messages::VERIFY_LINK_INVALID),
    };

    match client.verify_email(token).await {
        Ok(()) => StatusMessage::success(messages::VERIFY_SUCCESS),
        Err(e) => {
            tracing::error!("Email verification failed: {}", e);
            StatusMessage::error(messages::VERIFY_LINK_EXPIRED)
        }
    }
}

pub async fn resend_verification(
    client: &ApiClient,
    email: &str,
    frontend_url: Option<&str>,
) -> Result<StatusMessage, FieldErrors> {
    Validator::new().email("email", email).finish()?;

    let request = EmailRequest {
        email: email.trim().to_string(),
        frontend_url: frontend_url.map(str::to_string),
    };
    match client.resend_verification(&request).await {
        Ok(()) => Ok(StatusMessage::success(messages::VERIFICATION_SENT)),
        Err(e) => {
            tracing::error!("Resending verification failed: {}", e);
            Err(FieldErrors::single("general", messages::RESEND_FAILED))
        }
    }
}
