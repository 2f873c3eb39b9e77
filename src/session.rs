use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{LoginResponse, User};
use crate::navigation::NavigationMode;
use crate::routes::Route;

/// Snapshot of the signed-in state.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }
}

/// The signed-in user for one console process, mirrored to the token cache.
///
/// Starts in the loading state; call [`Session::initialize`] once to
/// re-validate whatever the cache holds. Concurrent calls are not
/// de-duplicated and the last write wins.
pub struct Session {
    client: ApiClient,
    state: RwLock<AuthState>,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: RwLock::new(AuthState::default()),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> AuthState {
        self.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn check_is_admin(&self) -> bool {
        self.read().user.as_ref().map_or(false, |u| u.is_admin)
    }

    /// Re-validate the cached user against `/api/users/me`.
    pub async fn initialize(&self) {
        let cache = self.client.cache();

        if cache.get_current_user().is_some() {
            match self.client.fetch_current_user().await {
                Ok(fresh) => {
                    cache.set_current_user(&fresh);
                    self.write().user = Some(fresh);
                }
                Err(e) => {
                    tracing::info!("Cached session is no longer valid: {}", e);
                    cache.clear_token();
                    self.write().user = None;
                }
            }
        }

        self.write().is_loading = false;
    }

    /// Sign in and persist the token and user.
    ///
    /// Active accounts are sent to the dashboard. Inactive accounts still
    /// resolve, without navigation, so the caller can explain why.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        self.write().is_loading = true;

        let result = self.client.login(email, password).await;

        let outcome = match result {
            Ok(response) => {
                let cache = self.client.cache();
                cache.set_token(&response.access_token);
                cache.set_current_user(&response.user);
                self.write().user = Some(response.user.clone());

                if response.user.is_active {
                    self.client
                        .navigator()
                        .navigate(Route::UserDashboard, NavigationMode::Push);
                } else {
                    tracing::warn!("Account {} is not active", response.user.email);
                }
                Ok(response)
            }
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                Err(e)
            }
        };

        self.write().is_loading = false;
        outcome
    }

    /// Local sign-out; never contacts the backend.
    pub fn logout(&self) {
        self.client.cache().clear_token();
        self.write().user = None;
        self.client
            .navigator()
            .navigate(Route::Login, NavigationMode::Push);
    }

    /// Fetch the authoritative user and overwrite memory and cache.
    pub async fn refresh_user(&self) -> Result<User, ClientError> {
        let fresh = self.client.fetch_current_user().await.map_err(|e| {
            tracing::error!("Failed to refresh user: {}", e);
            e
        })?;

        self.client.cache().set_current_user(&fresh);
        self.write().user = Some(fresh.clone());
        Ok(fresh)
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn set_state(&self, state: AuthState) {
        *self.write() = state;
    }
}
