pub mod commands;
pub mod config;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::guard::{GuardDecision, ProtectedRoute};
use crate::navigation::History;
use crate::routes::Route;
use crate::session::Session;
use crate::store::{FileStore, TokenCache};

#[derive(Parser)]
#[command(name = "usercenter")]
#[command(about = "User center console - accounts, administration and notes")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "USERCENTER_API_URL", help = "Backend base URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, register and recover accounts")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Your dashboard, profile and security")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "User administration (admins only)")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },

    #[command(about = "Browse collected notes")]
    Notes {
        #[command(subcommand)]
        cmd: commands::notes::NotesCommands,
    },

    #[command(about = "Resolve a route path and check whether it may be shown")]
    Open {
        #[arg(help = "Route path, e.g. /admin/user-detail/3")]
        path: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: the session, its redirect log and the
/// chosen output format.
pub struct Console {
    pub session: Session,
    pub history: Arc<History>,
    pub output: OutputFormat,
}

impl Console {
    pub fn connect(app: &AppConfig, output: OutputFormat) -> anyhow::Result<Self> {
        let store = FileStore::new(config::session_file()?);
        let history = Arc::new(History::new());
        let client = ApiClient::new(&app.api, TokenCache::new(Arc::new(store)), history.clone())?;

        Ok(Self {
            session: Session::new(client),
            history,
            output,
        })
    }

    pub fn client(&self) -> &ApiClient {
        self.session.client()
    }

    /// Restore the cached session and apply the route guard. Returns `false`
    /// when the command must not run.
    pub async fn enter(&self, route: &Route) -> anyhow::Result<bool> {
        if self.session.is_loading() {
            self.session.initialize().await;
        }

        let Some(guard) = ProtectedRoute::for_route(route) else {
            return Ok(true);
        };
        match guard.check(&self.session) {
            GuardDecision::Render => Ok(true),
            GuardDecision::Loading | GuardDecision::Redirect(_) => {
                tracing::info!("{} is not available to this session", route);
                Ok(false)
            }
        }
    }

    /// Report redirects issued while the command ran (e.g. a 401 sign-out).
    pub fn finish(&self) -> anyhow::Result<()> {
        for navigation in self.history.take() {
            tracing::debug!("redirect recorded: {:?}", navigation);
            utils::output_navigation(&self.output, &navigation)?;
        }
        Ok(())
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let mut app = crate::config::config().clone();
    if let Some(url) = cli.api_url.as_deref() {
        app.api.base_url = url.trim_end_matches('/').to_string();
    }

    let console = Console::connect(&app, output_format)?;

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &console).await,
        Commands::User { cmd } => commands::user::handle(cmd, &console).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, &console).await,
        Commands::Notes { cmd } => commands::notes::handle(cmd, &console).await,
        Commands::Open { path } => commands::open::handle(&path, &console).await,
    };

    console.finish()?;
    result
}
