use crate::api::ApiResponse;
use crate::error::ApiError;
use crate::notify::UnauthorizedEvent;
use crate::session::StoredSession;
use crate::ui::highlight::BodyHighlighter;
use colored::*;

/// Print a successful response body, highlighted when it is JSON
pub fn display_response(response: &ApiResponse, verbose: bool) {
    if verbose {
        eprintln!("{}", format!("[market] {} {}", response.status, response.url).dimmed());
    }
    if response.body.is_empty() {
        println!("{}", format!("{} (empty body)", response.status).green());
        return;
    }

    if !response.is_json() {
        println!("{}", response.text());
        return;
    }

    let highlighter = BodyHighlighter::new();
    match response.json_value() {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| response.text());
            print!("{}", highlighter.boxed(response.status.as_str(), &pretty, "json"));
        }
        Err(_) => println!("{}", response.text()),
    }
}

/// Banner shown once per cooldown window when the session was rejected
pub fn display_unauthorized(event: &UnauthorizedEvent) {
    eprintln!(
        "{}",
        "You are not authorized. Your session has ended, please sign in again."
            .red()
            .bold()
    );
    eprintln!("{}", format!("  ({} {})", event.method, event.url).dimmed());
}

pub fn display_error(error: &ApiError) {
    match error.status() {
        Some(status) => {
            let detail = error.server_message().unwrap_or_default();
            eprintln!("{} {} {}", "Error:".red(), status, detail);
        }
        None => eprintln!("{} {}", "Error:".red(), error),
    }
}

pub fn display_session(stored: &StoredSession) {
    let token = match stored.session.token() {
        Some(token) => mask_token(token),
        None => "(none)".to_string(),
    };
    println!("{} {}", "token: ".cyan(), token);
    println!(
        "{} {}",
        "locale:".cyan(),
        stored.session.locale_code().unwrap_or("(none)")
    );
    if stored.unauthorized {
        println!("{} {}", "status:".cyan(), "unauthorized".red());
    }
    println!(
        "{}",
        format!("updated {}", stored.updated_at.format("%Y-%m-%d %H:%M:%S")).dimmed()
    );
}

/// Keep the first and last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
