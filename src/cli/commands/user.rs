use clap::Subcommand;
use serde_json::json;

use super::{client_failure, require};
use crate::cli::utils::*;
use crate::cli::Console;
use crate::messages;
use crate::models::{format_timestamp, LoginHistory, UserUpdate};
use crate::routes::Route;
use crate::views::user::{update_profile, AccountSecurity, ChangePasswordForm, Dashboard};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Show your account with recent logins and activity")]
    Dashboard,

    #[command(about = "Show or edit your profile")]
    Profile {
        #[arg(long, help = "New username")]
        username: Option<String>,
        #[arg(long, help = "Avatar URL")]
        avatar: Option<String>,
        #[arg(long, help = "Short bio")]
        bio: Option<String>,
    },

    #[command(about = "Change your password")]
    ChangePassword {
        #[arg(long, env = "USERCENTER_PASSWORD", hide_env_values = true, help = "Current password")]
        old_password: String,
        #[arg(long, env = "USERCENTER_NEW_PASSWORD", hide_env_values = true, help = "New password")]
        new_password: String,
        #[arg(long, help = "Password confirmation (defaults to --new-password)")]
        confirm: Option<String>,
    },

    #[command(about = "Show your login history")]
    Security {
        #[arg(long, default_value_t = 1, help = "Page number")]
        page: u64,
    },
}

pub(crate) fn login_row(entry: &LoginHistory) -> String {
    format!(
        "{}  {}  {}",
        format_timestamp(&entry.login_time),
        or_dash(Some(entry.ip_address.as_str())),
        or_dash(Some(entry.user_agent.as_str()))
    )
}

pub async fn handle(cmd: UserCommands, console: &Console) -> anyhow::Result<()> {
    let output = &console.output;

    match cmd {
        UserCommands::Dashboard => {
            require(console, Route::UserDashboard).await?;
            let dashboard = Dashboard::load(&console.session)
                .await
                .map_err(|e| client_failure(console, e))?;

            let mut lines = vec![
                ("User", format!("{} <{}>", dashboard.user.username, dashboard.user.email)),
                ("Role", dashboard.user.role_label().to_string()),
                ("Verified", dashboard.user.verified_label().to_string()),
            ];
            for entry in &dashboard.recent_logins {
                lines.push(("Login", login_row(entry)));
            }
            for entry in &dashboard.recent_activity {
                lines.push((
                    "Activity",
                    format!("{}  {}", format_timestamp(&entry.created_at), entry.action),
                ));
            }
            output_record(output, "dashboard", json!(dashboard), &lines)
        }
        UserCommands::Profile { username, avatar, bio } => {
            require(console, Route::UserProfile).await?;
            let update = UserUpdate { username, avatar, bio };

            if update.is_empty() {
                let user = console
                    .session
                    .user()
                    .ok_or_else(|| anyhow::anyhow!("no signed-in user"))?;
                return output_record(
                    output,
                    "user",
                    json!(user),
                    &[
                        ("Username", user.username.clone()),
                        ("Email", user.email.clone()),
                        ("Avatar", or_dash(user.avatar.as_deref())),
                        ("Bio", or_dash(user.bio.as_deref())),
                        ("Joined", format_timestamp(&user.created_at)),
                    ],
                );
            }

            match update_profile(&console.session, &update).await {
                Ok(user) => output_success(output, messages::PROFILE_UPDATED, Some(json!({ "user": user }))),
                Err(crate::error::ClientError::Validation(errors)) => output_field_errors(output, &errors),
                Err(e) => {
                    output_error(output, messages::PROFILE_UPDATE_FAILED, Some(e.error_code()))?;
                    Err(e.into())
                }
            }
        }
        UserCommands::ChangePassword { old_password, new_password, confirm } => {
            require(console, Route::ChangePassword).await?;
            let form = ChangePasswordForm {
                old_password,
                confirm_password: confirm.unwrap_or_else(|| new_password.clone()),
                new_password,
            };
            match form.submit(&console.session).await {
                Ok(status) => output_status(output, &status),
                Err(errors) => output_field_errors(output, &errors),
            }
        }
        UserCommands::Security { page } => {
            require(console, Route::AccountSecurity).await?;
            let mut security = AccountSecurity::new();
            security
                .load(&console.session, page)
                .await
                .map_err(|e| client_failure(console, e))?;

            if security.logins.is_empty() {
                return output_empty_collection(output, "logins", "No login records");
            }
            let rows: Vec<String> = security.logins.iter().map(login_row).collect();
            let footer = format!(
                "page {}{}",
                security.page,
                if security.has_next_page() { " (more available)" } else { "" }
            );
            output_rows(output, "logins", json!(security.logins), &rows, Some(&footer))
        }
    }
}
