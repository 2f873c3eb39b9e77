use serde_json::json;

use super::admin::{self, AdminCommands};
use super::notes::{self, NotesCommands};
use super::user::{self, UserCommands};
use crate::cli::utils::*;
use crate::cli::Console;
use crate::guard::{GuardDecision, ProtectedRoute};
use crate::routes::Route;
use crate::views::auth::verify_email;

/// Resolve `path` the way the router would, apply the guard and, when the
/// page may be shown, run its default view.
pub async fn handle(path: &str, console: &Console) -> anyhow::Result<()> {
    let route = Route::parse(path)?;
    console.session.initialize().await;

    let decision = match ProtectedRoute::for_route(&route) {
        Some(guard) => guard.check(&console.session),
        None => GuardDecision::Render,
    };

    if decision != GuardDecision::Render {
        let (outcome, target) = match &decision {
            GuardDecision::Redirect(to) => ("redirect", Some(to.path())),
            _ => ("loading", None),
        };
        return output_record(
            &console.output,
            "route",
            json!({
                "path": route.path(),
                "decision": outcome,
                "redirect": target,
            }),
            &[("Route", route.path()), ("Decision", outcome.to_string())],
        );
    }

    match route {
        Route::UserDashboard => user::handle(UserCommands::Dashboard, console).await,
        Route::UserProfile => {
            let show = UserCommands::Profile { username: None, avatar: None, bio: None };
            user::handle(show, console).await
        }
        Route::AccountSecurity => user::handle(UserCommands::Security { page: 1 }, console).await,
        Route::Admin => admin::handle(AdminCommands::Stats, console).await,
        Route::UserManagement => {
            let list = AdminCommands::List {
                search: None,
                active: None,
                verified: None,
                admin: None,
                sort: None,
                order: None,
                page: 1,
            };
            admin::handle(list, console).await
        }
        Route::UserDetail { user_id } => {
            admin::handle(AdminCommands::Show { id: user_id, history_page: 1 }, console).await
        }
        Route::Notes => {
            let list = NotesCommands::List {
                filters: Vec::new(),
                sort: None,
                order: None,
                page: 1,
                page_size: None,
            };
            notes::handle(list, console).await
        }
        Route::NoteDetail { note_id } => {
            notes::handle(NotesCommands::Show { note_id, sections: Vec::new() }, console).await
        }
        Route::VerifyEmail { token } => {
            let status = verify_email(console.client(), token.as_deref()).await;
            output_status(&console.output, &status)
        }
        // Form pages need input; point at the matching subcommand.
        other => output_record(
            &console.output,
            "route",
            json!({ "path": other.path(), "decision": "render" }),
            &[
                ("Route", other.path()),
                ("Decision", "render".to_string()),
                ("Hint", form_hint(&other).to_string()),
            ],
        ),
    }
}

fn form_hint(route: &Route) -> &'static str {
    match route {
        Route::Login => "usercenter auth login <email>",
        Route::Register => "usercenter auth register <username> <email>",
        Route::ForgotPassword => "usercenter auth forgot-password <email>",
        Route::ResetPassword { .. } => "usercenter auth reset-password --token <token>",
        Route::ChangePassword => "usercenter user change-password",
        _ => "",
    }
}
