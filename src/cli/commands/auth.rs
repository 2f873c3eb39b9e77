use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::Console;
use crate::messages;
use crate::views::auth::{
    forgot_password, resend_verification, verify_email, LoginForm, RegisterForm, ResetPasswordForm,
};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in with email and password")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, env = "USERCENTER_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Sign out and forget the stored token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, env = "USERCENTER_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
        #[arg(long, help = "Password confirmation (defaults to --password)")]
        confirm: Option<String>,
    },

    #[command(about = "Send a password reset email")]
    ForgotPassword {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Front-end URL the reset link should point at")]
        frontend_url: Option<String>,
    },

    #[command(about = "Set a new password with a reset token")]
    ResetPassword {
        #[arg(long, help = "Token from the reset email")]
        token: Option<String>,
        #[arg(long, env = "USERCENTER_NEW_PASSWORD", hide_env_values = true, help = "New password")]
        password: String,
        #[arg(long, help = "Password confirmation (defaults to --password)")]
        confirm: Option<String>,
    },

    #[command(about = "Confirm an email address")]
    VerifyEmail {
        #[arg(help = "Token from the verification email")]
        token: Option<String>,
    },

    #[command(about = "Send the verification email again")]
    ResendVerification {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Front-end URL the verification link should point at")]
        frontend_url: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, console: &Console) -> anyhow::Result<()> {
    let output = &console.output;
    let client = console.client();

    match cmd {
        AuthCommands::Login { email, password } => {
            let form = LoginForm { email, password };
            match form.submit(&console.session).await {
                Ok(response) => output_success(
                    output,
                    messages::LOGIN_SUCCESS,
                    Some(json!({ "user": response.user })),
                ),
                Err(errors) => output_field_errors(output, &errors),
            }
        }
        AuthCommands::Logout => {
            console.session.logout();
            output_success(output, messages::LOGOUT_SUCCESS, None)
        }
        AuthCommands::Status => {
            console.session.initialize().await;
            match console.session.user() {
                Some(user) => output_record(
                    output,
                    "user",
                    json!(user),
                    &[
                        ("Signed in as", format!("{} <{}>", user.username, user.email)),
                        ("Role", user.role_label().to_string()),
                        ("Status", user.status_label().to_string()),
                    ],
                ),
                None => output_record(output, "user", json!(null), &[("Signed in", "no".to_string())]),
            }
        }
        AuthCommands::Register { username, email, password, confirm } => {
            let form = RegisterForm {
                username,
                email,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                password,
            };
            match form.submit(client).await {
                Ok(user) => output_success(
                    output,
                    messages::REGISTER_SUCCESS,
                    Some(json!({ "user": user })),
                ),
                Err(errors) => output_field_errors(output, &errors),
            }
        }
        AuthCommands::ForgotPassword { email, frontend_url } => {
            match forgot_password(client, &email, frontend_url.as_deref()).await {
                Ok(status) => output_status(output, &status),
                Err(errors) => output_field_errors(output, &errors),
            }
        }
        AuthCommands::ResetPassword { token, password, confirm } => {
            let form = ResetPasswordForm {
                token,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                new_password: password,
            };
            match form.submit(client).await {
                Ok(status) => output_status(output, &status),
                Err(errors) => output_field_errors(output, &errors),
            }
        }
        AuthCommands::VerifyEmail { token } => {
            let status = verify_email(client, token.as_deref()).await;
            output_status(output, &status)?;
            match status.kind {
                crate::views::MessageKind::Success => Ok(()),
                crate::views::MessageKind::Error => Err(anyhow::anyhow!("{}", status.text)),
            }
        }
        AuthCommands::ResendVerification { email, frontend_url } => {
            match resend_verification(client, &email, frontend_url.as_deref()).await {
                Ok(status) => output_status(output, &status),
                Err(errors) => output_field_errors(output, &errors),
            }
        }
    }
}
