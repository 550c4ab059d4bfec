//! Output tidying: deterministic whitespace cleanup of generated text.
//!
//! Even well-prompted models occasionally emit Windows line endings,
//! trailing spaces, or runs of blank lines. These rules normalise the
//! whitespace of each final output without touching content — the
//! summary, answer, and Q&A text stay word-for-word what the backend
//! generated.
//!
//! Rules (applied in order):
//! 1. Normalise line endings (CRLF → LF)
//! 2. Trim trailing whitespace per line
//! 3. Collapse 3+ consecutive blank lines down to 2
//! 4. Ensure the text ends with exactly one newline

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all tidying rules to one generated output.
pub fn tidy_output(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    ensure_final_newline(&s)
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_becomes_lf() {
        assert_eq!(tidy_output("a\r\nb\rc"), "a\nb\nc\n");
    }

    #[test]
    fn trailing_spaces_are_stripped() {
        assert_eq!(tidy_output("- point one   \n- point two\t"), "- point one\n- point two\n");
    }

    #[test]
    fn blank_line_runs_collapse() {
        assert_eq!(tidy_output("Q1: a\n\n\n\n\n\nQ2: b"), "Q1: a\n\n\nQ2: b\n");
    }

    #[test]
    fn exactly_one_final_newline() {
        assert_eq!(tidy_output("text"), "text\n");
        assert_eq!(tidy_output("text\n\n\n"), "text\n");
    }

    #[test]
    fn content_is_untouched() {
        let generated = "Q1: What is covered?\nA1: The 2024 results.";
        let tidied = tidy_output(generated);
        assert!(tidied.contains("Q1: What is covered?"));
        assert!(tidied.contains("A1: The 2024 results."));
    }
}
