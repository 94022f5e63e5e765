use std::{env, env::VarError};

use freehub_engine::db_types::{UserId, UserProfile};

use crate::{auth::TokenIssuer, config::AuthConfig};

/// There's no real CLI for the server, so just do quick 'n dirty.
///
/// Returns `true` if command line arguments were given and handled, in which case the server should not start.
pub fn handle_command_line_args() -> bool {
    let args = env::args().skip(1).collect::<Vec<String>>();
    match args.first().map(String::as_str) {
        None => false,
        Some("issue-token") => {
            issue_token(&args[1..]);
            true
        },
        Some(_) => {
            display_readme();
            display_envs();
            true
        },
    }
}

fn issue_token(args: &[String]) {
    let [id, name, email] = args else {
        eprintln!("Usage: freehub_server issue-token <user_id> <name> <email>");
        return;
    };
    let id = match id.parse::<i64>() {
        Ok(id) if id > 0 => UserId(id),
        _ => {
            eprintln!("{id} is not a valid user id");
            return;
        },
    };
    let config = match AuthConfig::try_from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Tokens can only be issued with a configured secret. {e}");
            return;
        },
    };
    let issuer = TokenIssuer::new(&config);
    match issuer.issue_token(&UserProfile::new(id, name.as_str(), email.as_str()), None) {
        Ok(token) => println!("{token}"),
        Err(e) => eprintln!("{e}"),
    }
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 8] = [
        "RUST_LOG",
        "FH_HOST",
        "FH_PORT",
        "FH_DATABASE_URL",
        "FH_TOKEN_LIFETIME_HOURS",
        "FH_ENVIRONMENT",
        "FH_EVENT_BUFFER_SIZE",
        "FH_SKIP_MIGRATIONS",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
