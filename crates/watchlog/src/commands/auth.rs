//! Account commands: login, register, logout, status.

use std::os::unix::fs::PermissionsExt;

use anyhow::Result;
use colored::Colorize;
use dialoguer::Password;

use crate::cli::AuthAction;
use watchlog_core::SessionManager;
use watchlog_core::config::Config;
use watchlog_core::error::Error;
use watchlog_core::guard::{self, Access};

/// Handle auth commands
pub async fn execute(action: AuthAction, session: &SessionManager, config: &Config) -> Result<()> {
    match action {
        AuthAction::Login { email } => login(session, &email).await,
        AuthAction::Register { name, email } => register(session, &name, &email).await,
        AuthAction::Logout => logout(session),
        AuthAction::Status => status(session, config),
    }
}

async fn login(session: &SessionManager, email: &str) -> Result<()> {
    // Same gate the web app's login page sits behind
    if guard::public_only(&session.snapshot()) != Access::Allow {
        println!(
            "{} Already logged in. Use {} first.",
            "✓".green(),
            "watchlog auth logout".cyan()
        );
        return Ok(());
    }

    let password = Password::new().with_prompt("Password").interact()?;

    match session.login(email, &password).await {
        Ok(()) => {
            let name = session.user().map(|u| u.name).unwrap_or_default();
            println!("{} Logged in as {}", "✓".green(), name.cyan());
            Ok(())
        }
        Err(Error::Authentication(msg)) => {
            println!("{} Login failed: {msg}", "✗".red());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn register(session: &SessionManager, name: &str, email: &str) -> Result<()> {
    if guard::public_only(&session.snapshot()) != Access::Allow {
        println!("{} Already logged in.", "✓".green());
        return Ok(());
    }

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    match session.register(name, email, &password).await {
        Ok(()) => {
            // Registration never yields a token; the login flow comes next
            println!(
                "{} Account created. Log in with {}.",
                "✓".green(),
                format!("watchlog auth login {email}").cyan()
            );
            Ok(())
        }
        Err(Error::Registration(msg)) => {
            println!("{} Registration failed: {msg}", "✗".red());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn logout(session: &SessionManager) -> Result<()> {
    session.logout();
    println!("{} Logged out.", "✓".green());
    Ok(())
}

/// Show session status
fn status(session: &SessionManager, config: &Config) -> Result<()> {
    println!("{}", "Session Status".bold());
    println!("{}", "─".repeat(40));
    println!("API:       {}", config.api.url.cyan());

    match session.user() {
        Some(user) => println!("Account:   {} ({})", user.name.green(), user.email),
        None => println!("Account:   {}", "Not logged in".red()),
    }

    let token_path = session.store().token_path();
    if token_path.exists() {
        let token = std::fs::read_to_string(&token_path)?;
        let prefix = &token[..8.min(token.len())];
        println!("Token:     {} ({}...)", "Present".green(), prefix.yellow());

        let mode = std::fs::metadata(&token_path)?.permissions().mode() & 0o777;
        if mode == 0o600 {
            println!("Perms:     {} (0600)", "Secure".green());
        } else {
            println!("Perms:     {} ({:o})", "Insecure".yellow(), mode);
        }
    } else {
        println!("Token:     {}", "Absent".red());
    }

    Ok(())
}
