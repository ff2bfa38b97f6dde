use clap::Parser;
use colored::*;
use market_client::api::{self, ApiClient};
use market_client::cli::{parse_query_pair, Args, Command, SessionAction};
use market_client::config::Config;
use market_client::session::{FilesystemSessionStore, NoSession, SessionAccessor};
use market_client::ui::{display_error, display_response, display_session, display_unauthorized};
use reqwest::Method;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let Some(command) = args.command else {
        eprintln!("{}", "Usage: market [OPTIONS] <COMMAND>".red());
        eprintln!("{}", "  Run `market --help` for the list of commands.".dimmed());
        process::exit(1);
    };

    let store = Arc::new(FilesystemSessionStore::new(&config.session_dir));

    match command {
        Command::Session { action } => run_session(&store, action)?,
        Command::Logout => {
            let client = build_client(&config, Arc::clone(&store))?;
            if let Err(e) = api::logout(&client).await {
                tracing::warn!(error = %e, "server logout failed");
                if config.verbose {
                    display_error(&e);
                }
            }
            store.clear()?;
            println!("{}", "Logged out.".green());
        }
        Command::Get { path, query } => {
            let client = build_client(&config, Arc::clone(&store))?;
            send(&client, Method::GET, &path, &query, None, config.verbose).await;
        }
        Command::Request {
            method,
            path,
            query,
            data,
        } => {
            let method = match Method::from_bytes(method.to_uppercase().as_bytes()) {
                Ok(method) => method,
                Err(_) => {
                    eprintln!("{} invalid HTTP method '{}'", "Error:".red(), method);
                    process::exit(1);
                }
            };
            let body = match data.as_deref().map(serde_json::from_str::<serde_json::Value>) {
                Some(Ok(body)) => Some(body),
                Some(Err(e)) => {
                    eprintln!("{} --data is not valid JSON: {}", "Error:".red(), e);
                    process::exit(1);
                }
                None => None,
            };
            let client = build_client(&config, Arc::clone(&store))?;
            send(&client, method, &path, &query, body, config.verbose).await;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "market_client=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: &Config, store: Arc<FilesystemSessionStore>) -> anyhow::Result<ApiClient> {
    let session: Arc<dyn SessionAccessor> = if config.use_session {
        store
    } else {
        Arc::new(NoSession)
    };

    let client = ApiClient::from_config(&config.client)
        .session(session)
        .on_unauthorized(display_unauthorized)
        .build()?;

    if config.verbose {
        eprintln!("{}", format!("[market] Base URL: {}", client.base_url()).dimmed());
    }
    Ok(client)
}

async fn send(
    client: &ApiClient,
    method: Method,
    path: &str,
    query: &[String],
    body: Option<serde_json::Value>,
    verbose: bool,
) {
    let mut request = client.request(method, path);
    for raw in query {
        let (key, value) = parse_query_pair(raw);
        request = request.query(&key, value);
    }
    if let Some(body) = body {
        request = match request.json(&body) {
            Ok(request) => request,
            Err(e) => {
                display_error(&e);
                process::exit(1);
            }
        };
    }

    match request.send().await {
        Ok(response) => display_response(&response, verbose),
        Err(e) => {
            display_error(&e);
            process::exit(1);
        }
    }
}

fn run_session(store: &FilesystemSessionStore, action: SessionAction) -> anyhow::Result<()> {
    match action {
        SessionAction::Show => display_session(&store.load()),
        SessionAction::Set { token, locale } => {
            if token.is_none() && locale.is_none() {
                eprintln!("{}", "Nothing to set: pass --token and/or --locale".yellow());
                process::exit(1);
            }
            let stored = store.update(token.as_deref(), locale.as_deref())?;
            display_session(&stored);
        }
        SessionAction::Clear => {
            store.clear()?;
            println!("{}", "Session cleared.".green());
        }
    }
    Ok(())
}
