use colored::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};
use terminal_size::{terminal_size, Width};

const FALLBACK_WIDTH: usize = 60;
const MAX_WIDTH: usize = 100;

/// Syntax highlighter for response bodies.
pub struct BodyHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl BodyHighlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Highlight `body` using the syntax registered for `lang` (e.g. "json").
    /// Falls back to the plain text when highlighting fails.
    pub fn highlight(&self, body: &str, lang: &str) -> String {
        let theme = &self.theme_set.themes["Solarized (dark)"];
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();

        for line in LinesWithEndings::from(body) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false)),
                Err(_) => output.push_str(line),
            }
        }
        output.push_str("\x1b[0m");

        output
    }

    /// Render `body` inside a titled box sized to the terminal.
    pub fn boxed(&self, title: &str, body: &str, lang: &str) -> String {
        let width = box_width();
        let rule = width.saturating_sub(title.chars().count() + 4);

        let mut output = format!(
            "{}[{}]{}\n",
            "┌─".dimmed(),
            title.cyan(),
            "─".repeat(rule).dimmed()
        );
        let body = if body.ends_with('\n') {
            body.to_string()
        } else {
            format!("{}\n", body)
        };
        output.push_str(&self.highlight(&body, lang));
        output.push_str(&format!("{}{}\n", "└".dimmed(), "─".repeat(width - 1).dimmed()));
        output
    }
}

impl Default for BodyHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

fn box_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| (w as usize).min(MAX_WIDTH))
        .unwrap_or(FALLBACK_WIDTH)
        .max(20)
}
