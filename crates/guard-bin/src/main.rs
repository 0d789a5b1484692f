//! Line-oriented demo adapter for the AuthGate guard engine.
//!
//! Reads commands from stdin, one connection event or auth attempt per
//! line, and translates typed outcomes into text. This is the presentation
//! boundary; the engine itself never prints.
//!
//! Commands:
//!   connect <key>                                  start tracking a connection
//!   register <key> <user> <pass> <confirm> [email] register an identity
//!   login <key> <user> <pass>                      authenticate a connection
//!   logged <key>                                   query session state
//!   disconnect <key>                               drop a connection
//!   quit

use anyhow::Result;
use authgate_common::{LoginPayload, RegistrationPayload};
use clap::Parser;
use guard_lib::{config::Settings, Guard};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(name = "authgate", about = "Multiplayer server authentication guard")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "authgate.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let settings = Settings::load_from(&args.config)?;
    if !settings.guard_enabled() {
        println!("guard disabled: server is open to everyone");
    }
    let guard = Guard::from_settings(settings).await?;
    info!(data_source = ?guard.settings.data_source, "guard ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["connect", key] => {
                let kicked = (*key).to_string();
                guard.sessions.schedule_expiry(key, move || {
                    println!("{kicked} kicked: took too long to authenticate");
                });
                println!("{key} connected, authentication window open");
            }
            ["register", key, username, password, confirmation, rest @ ..] => {
                let payload = RegistrationPayload {
                    identity_key: (*key).to_string(),
                    username: (*username).to_string(),
                    email: rest.first().map(|email| (*email).to_string()),
                    password: (*password).to_string(),
                    password_confirmation: (*confirmation).to_string(),
                    email_required: guard.settings.identifier_required,
                };
                match guard.registrator.register(payload).await {
                    Ok(record) => println!("registered {}", record.username),
                    Err(err) => println!("register failed: {}", err.sanitized_message()),
                }
            }
            ["login", key, username, password] => {
                let payload = LoginPayload {
                    identity_key: (*key).to_string(),
                    username: (*username).to_string(),
                    password: (*password).to_string(),
                };
                match guard.authenticator.login(payload).await {
                    Ok(record) => println!("welcome back, {}", record.username),
                    Err(err) => println!("login failed: {}", err.sanitized_message()),
                }
            }
            ["logged", key] => {
                println!("{key} logged: {}", guard.authenticator.is_logged(key));
            }
            ["disconnect", key] => {
                guard.sessions.deauthorize(key);
                println!("{key} disconnected");
            }
            ["quit"] => break,
            [] => {}
            _ => println!("unknown command"),
        }
    }

    Ok(())
}
