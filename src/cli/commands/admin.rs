use clap::Subcommand;
use serde_json::json;

use super::user::login_row;
use super::{apply_sort, client_failure, require, Order};
use crate::cli::utils::*;
use crate::cli::Console;
use crate::models::{format_timestamp, User};
use crate::routes::Route;
use crate::views::admin::{user_management, AdminStats, UserDetailView};

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Show user counts")]
    Stats,

    #[command(about = "List users with filters, sorting and paging")]
    List {
        #[arg(long, help = "Match username or email")]
        search: Option<String>,
        #[arg(long, help = "Only active (true) or inactive (false) users")]
        active: Option<bool>,
        #[arg(long, help = "Only verified (true) or unverified (false) users")]
        verified: Option<bool>,
        #[arg(long, help = "Only admins (true) or regular users (false)")]
        admin: Option<bool>,
        #[arg(long, help = "Sort field: created_at, username, email, last_login_at")]
        sort: Option<String>,
        #[arg(long, value_enum, help = "Sort direction (applies to the current sort field without --sort)")]
        order: Option<Order>,
        #[arg(long, default_value_t = 1, help = "Page number")]
        page: u32,
    },

    #[command(about = "Show one user with login and activity history")]
    Show {
        #[arg(help = "User ID")]
        id: i64,
        #[arg(long, default_value_t = 1, help = "History page")]
        history_page: u64,
    },

    #[command(about = "Activate a user")]
    Activate {
        #[arg(help = "User ID")]
        id: i64,
    },

    #[command(about = "Deactivate a user")]
    Deactivate {
        #[arg(help = "User ID")]
        id: i64,
    },

    #[command(about = "Grant admin rights")]
    Promote {
        #[arg(help = "User ID")]
        id: i64,
    },

    #[command(about = "Revoke admin rights")]
    Demote {
        #[arg(help = "User ID")]
        id: i64,
    },
}

fn user_row(user: &User) -> String {
    format!(
        "{:>5}  {:<16} {:<28} {}  {}  {}  {}",
        user.id,
        user.username,
        user.email,
        user.status_label(),
        user.verified_label(),
        user.role_label(),
        format_timestamp(&user.created_at)
    )
}

pub async fn handle(cmd: AdminCommands, console: &Console) -> anyhow::Result<()> {
    let output = &console.output;
    let client = console.client();

    match cmd {
        AdminCommands::Stats => {
            require(console, Route::Admin).await?;
            let stats = AdminStats::load(client)
                .await
                .map_err(|e| client_failure(console, e))?;
            output_record(
                output,
                "stats",
                json!(stats),
                &[
                    ("Total users", stats.total_users.to_string()),
                    ("Active", stats.active_users.to_string()),
                    ("Verified", stats.verified_users.to_string()),
                    ("Admins", stats.admin_users.to_string()),
                ],
            )
        }
        AdminCommands::List { search, active, verified, admin, sort, order, page } => {
            require(console, Route::UserManagement).await?;
            let mut view = user_management(client.clone());

            let query = view.query_mut();
            query.set_filter_str("search", search.as_deref().unwrap_or_default())?;
            for (field, value) in [("is_active", active), ("is_verified", verified), ("is_admin", admin)] {
                if let Some(value) = value {
                    query.set_filter_str(field, &value.to_string())?;
                }
            }
            apply_sort(query, sort.as_deref(), order)?;
            query.set_page(page)?;

            view.refresh().await.map_err(|e| client_failure(console, e))?;

            if view.items().is_empty() {
                return output_empty_collection(output, "users", "No users found");
            }
            let rows: Vec<String> = view.items().iter().map(user_row).collect();
            output_rows(output, "users", json!(view.items()), &rows, Some(&view.summary()))
        }
        AdminCommands::Show { id, history_page } => {
            require(console, Route::UserDetail { user_id: id }).await?;
            let mut detail = UserDetailView::new(client.clone(), id);
            detail.history_page = history_page.max(1);
            detail.load().await.map_err(|e| client_failure(console, e))?;

            let Some(user) = detail.user.as_ref() else {
                output_error(output, crate::messages::USER_NOT_FOUND, Some("NOT_FOUND"))?;
                return Err(anyhow::anyhow!("user {} not found", id));
            };

            let mut lines = vec![
                ("User", user_row(user)),
                ("Bio", or_dash(user.bio.as_deref())),
                ("Last login", or_dash(user.last_login_at.as_deref().map(format_timestamp).as_deref())),
            ];
            for entry in &detail.login_history {
                lines.push(("Login", login_row(entry)));
            }
            for entry in &detail.activity_history {
                lines.push((
                    "Activity",
                    format!("{}  {}  {}", format_timestamp(&entry.created_at), entry.action, entry.description),
                ));
            }
            output_record(
                output,
                "user",
                json!({
                    "user": user,
                    "login_history": detail.login_history,
                    "activity_history": detail.activity_history,
                    "history_page": detail.history_page,
                }),
                &lines,
            )
        }
        AdminCommands::Activate { id } => toggle(console, id, Toggle::Active(true)).await,
        AdminCommands::Deactivate { id } => toggle(console, id, Toggle::Active(false)).await,
        AdminCommands::Promote { id } => toggle(console, id, Toggle::Admin(true)).await,
        AdminCommands::Demote { id } => toggle(console, id, Toggle::Admin(false)).await,
    }
}

enum Toggle {
    Active(bool),
    Admin(bool),
}

async fn toggle(console: &Console, id: i64, toggle: Toggle) -> anyhow::Result<()> {
    require(console, Route::UserDetail { user_id: id }).await?;
    let mut detail = UserDetailView::new(console.client().clone(), id);

    let result = match toggle {
        Toggle::Active(value) => detail.set_active(value).await,
        Toggle::Admin(value) => detail.set_admin(value).await,
    };

    if let Some(status) = &detail.status {
        output_status(&console.output, status)?;
    }
    result?;
    Ok(())
}
