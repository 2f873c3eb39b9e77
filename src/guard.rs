use crate::navigation::NavigationMode;
use crate::routes::{Access, Route};
use crate::session::{AuthState, Session};

/// What a protected view should do right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading: show a neutral indicator, do not redirect.
    Loading,
    /// Send the viewer elsewhere and render nothing.
    Redirect(Route),
    Render,
}

/// Client-side route protection. This is a convenience for the console only;
/// the backend authorizes every request on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub admin_only: bool,
}

impl ProtectedRoute {
    pub fn authenticated() -> Self {
        Self { admin_only: false }
    }

    pub fn admin() -> Self {
        Self { admin_only: true }
    }

    /// Guard for a route, or `None` for public routes.
    pub fn for_route(route: &Route) -> Option<Self> {
        match route.access() {
            Access::Public => None,
            Access::Authenticated => Some(Self::authenticated()),
            Access::Admin => Some(Self::admin()),
        }
    }

    pub fn decide(&self, state: &AuthState) -> GuardDecision {
        if state.is_loading {
            return GuardDecision::Loading;
        }
        match &state.user {
            None => GuardDecision::Redirect(Route::Login),
            Some(user) if self.admin_only && !user.is_admin => {
                GuardDecision::Redirect(Route::UserDashboard)
            }
            Some(_) => GuardDecision::Render,
        }
    }

    /// Decide and carry out any redirect.
    pub fn check(&self, session: &Session) -> GuardDecision {
        let decision = self.decide(&session.state());
        if let GuardDecision::Redirect(route) = &decision {
            tracing::debug!("guard redirecting to {}", route);
            session
                .client()
                .navigator()
                .navigate(route.clone(), NavigationMode::Push);
        }
        decision
    }

    /// Build the protected content only when the viewer may see it.
    pub fn render<T>(&self, session: &Session, content: impl FnOnce() -> T) -> Option<T> {
        match self.check(session) {
            GuardDecision::Render => Some(content()),
            GuardDecision::Loading | GuardDecision::Redirect(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::ApiClient;
    use crate::config::ApiConfig;
    use crate::navigation::History;
    use crate::store::tests::sample_user;
    use crate::store::TokenCache;

    fn session_with(state: AuthState) -> (Session, Arc<History>) {
        let history = Arc::new(History::new());
        let api = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 200,
        };
        let client = ApiClient::new(&api, TokenCache::in_memory(), history.clone()).unwrap();
        let session = Session::new(client);
        session.set_state(state);
        (session, history)
    }

    fn loaded(user: Option<crate::models::User>) -> AuthState {
        AuthState { user, is_loading: false }
    }

    #[test]
    fn loading_never_redirects() {
        let (session, history) = session_with(AuthState::default());
        assert_eq!(ProtectedRoute::admin().check(&session), GuardDecision::Loading);
        assert!(history.entries().is_empty());
        assert_eq!(ProtectedRoute::admin().render(&session, || "secret"), None);
    }

    #[test]
    fn anonymous_goes_to_login() {
        let (session, history) = session_with(loaded(None));
        assert_eq!(ProtectedRoute::admin().render(&session, || "secret"), None);
        assert_eq!(history.count_to(&Route::Login), 1);
    }

    #[test]
    fn non_admin_goes_to_dashboard() {
        let (session, history) = session_with(loaded(Some(sample_user(false))));
        assert_eq!(
            ProtectedRoute::admin().check(&session),
            GuardDecision::Redirect(Route::UserDashboard)
        );
        assert_eq!(history.last().unwrap().route, Route::UserDashboard);
        assert_eq!(ProtectedRoute::authenticated().render(&session, || 1), Some(1));
    }

    #[test]
    fn admin_renders() {
        let (session, history) = session_with(loaded(Some(sample_user(true))));
        assert_eq!(ProtectedRoute::admin().render(&session, || "secret"), Some("secret"));
        assert!(history.entries().is_empty());
    }

    #[test]
    fn public_routes_have_no_guard() {
        assert_eq!(ProtectedRoute::for_route(&Route::Register), None);
        assert_eq!(
            ProtectedRoute::for_route(&Route::UserManagement),
            Some(ProtectedRoute::admin())
        );
    }
}
