//! login, register, logout, whoami

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Result, bail};
use colored::Colorize;
use hps_application::LoginOutcome;

use crate::context::AppContext;

pub async fn login(ctx: &AppContext, token: Option<String>) -> Result<()> {
    let token = identity_token(token)?;
    report(ctx.auth.login(&token).await)
}

pub async fn register(ctx: &AppContext, token: Option<String>) -> Result<()> {
    let token = identity_token(token)?;
    report(ctx.auth.register(&token).await)
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    if !ctx.auth.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    ctx.auth.logout().await?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.auth.current_user() {
        Some(user) => {
            println!("{}", user.display_name().bold());
            if let Some(email) = user.email.as_deref() {
                println!("{}", email);
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

fn report(outcome: LoginOutcome) -> Result<()> {
    match outcome {
        LoginOutcome::Success { user } => {
            println!("{} {}", "Signed in as".green(), user.display_name().bold());
            Ok(())
        }
        LoginOutcome::Failure { error } => bail!(error),
    }
}

/// The token from the command line, else the first line of stdin.
fn identity_token(arg: Option<String>) -> Result<String> {
    if let Some(token) = arg.filter(|t| !t.trim().is_empty()) {
        return Ok(token.trim().to_string());
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Google ID token: ");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;

    let token = line.trim();
    if token.is_empty() {
        bail!("No ID token given");
    }
    Ok(token.to_string())
}
