use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Default)]
#[command(name = "market")]
#[command(about = "Command-line client for the marketplace REST API", long_about = None)]
pub struct Args {
    #[arg(long = "api-origin", global = true, help = "API origin (e.g., https://api.example.com)")]
    pub api_origin: Option<String>,

    #[arg(long = "api-prefix", global = true, help = "API path prefix (e.g., /api/v1)")]
    pub api_prefix: Option<String>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Log request details to stderr")]
    pub verbose: bool,

    #[arg(
        long = "no-session",
        global = true,
        help = "Send requests without the stored token and locale"
    )]
    pub no_session: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a request with any method
    Request {
        #[arg(help = "HTTP method (GET, POST, PUT, PATCH, DELETE)")]
        method: String,
        #[arg(help = "Path relative to the API base URL, or an absolute URL")]
        path: String,
        #[arg(short = 'q', long = "query", help = "Query parameter as key=value")]
        query: Vec<String>,
        #[arg(short = 'd', long = "data", help = "JSON request body")]
        data: Option<String>,
    },
    /// Send a GET request
    Get {
        path: String,
        #[arg(short = 'q', long = "query", help = "Query parameter as key=value")]
        query: Vec<String>,
    },
    /// Inspect or edit the stored session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// End the session on the server and forget the stored token
    Logout,
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    Show,
    Set {
        #[arg(long = "token")]
        token: Option<String>,
        #[arg(long = "locale")]
        locale: Option<String>,
    },
    Clear,
}

/// Split `key=value`. A missing `=` yields an empty value.
pub fn parse_query_pair(raw: &str) -> (String, String) {
    match raw.split_once('=') {
        Some((key, value)) => (key.to_string(), value.to_string()),
        None => (raw.to_string(), String::new()),
    }
}
