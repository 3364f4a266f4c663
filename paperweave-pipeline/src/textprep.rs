use std::sync::OnceLock;

use regex::Regex;

fn hyphen_break() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\w)-\s*\n\s*(\w)").unwrap())
}

fn inline_whitespace() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[ \t]+").unwrap())
}

fn blank_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

fn metadata_keywords() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(?:university|institute|faculty|department|school of|affiliation|corresponding author|preprint|arxiv|doi|copyright|acknowledg(?:e)?ments?)",
        )
        .unwrap()
    })
}

fn contact_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)@|orcid\.org|https?://").unwrap())
}

fn author_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z][a-z]+(?: [A-Z]\.)?(?: [A-Z][a-z]+)+(?:, [A-Z][a-z]+.*)*$").unwrap()
    })
}

fn venue_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)(proceedings of|iclr|neurips|icml|acl|emnlp)\b").unwrap())
}

fn references_heading() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\n\s*(references|bibliography)\s*\n").unwrap())
}

/// Fixes the usual PDF-extraction damage: re-joins hyphenated line breaks,
/// collapses runs of spaces, trims line ends, squeezes blank-line runs.
fn normalize_text(raw_text: &str) -> String {
    if raw_text.is_empty() {
        return String::new();
    }
    let text = hyphen_break().replace_all(raw_text, "$1$2");
    let text = inline_whitespace().replace_all(&text, " ");
    let text: String = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    let text = blank_runs().replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Drops the metadata header: author lines, affiliations, contact details and
/// venue boilerplate in the first 200 lines. The rest passes through.
fn strip_meta_head(raw_text: &str) -> String {
    if raw_text.is_empty() {
        return String::new();
    }
    let lines: Vec<&str> = raw_text.lines().collect();
    let head_len = lines.len().min(200);
    let mut kept: Vec<String> = Vec::with_capacity(lines.len());

    for line in &lines[..head_len] {
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }
        if stripped.eq_ignore_ascii_case("abstract") {
            kept.push("Abstract".to_string());
            continue;
        }
        if contact_line().is_match(stripped) {
            continue;
        }
        if metadata_keywords().is_match(stripped) {
            continue;
        }
        let has_upper = stripped.chars().any(char::is_uppercase);
        let has_lower = stripped.chars().any(char::is_lowercase);
        if stripped.len() > 6 && has_upper && !has_lower {
            continue;
        }
        if author_line().is_match(stripped) {
            continue;
        }
        if venue_line().is_match(stripped) {
            continue;
        }
        kept.push((*line).to_string());
    }
    for line in &lines[head_len..] {
        kept.push((*line).to_string());
    }

    normalize_text(&kept.join("\n"))
}

/// Cuts the bibliography when a References/Bibliography heading is followed
/// by a substantial tail (> 800 chars); short tails are kept as-is.
fn strip_references_tail(raw_text: &str) -> String {
    if raw_text.is_empty() {
        return String::new();
    }
    if let Some(found) = references_heading().find(raw_text) {
        let tail_len = raw_text.len() - found.start();
        if tail_len > 800 {
            return raw_text[..found.start()].trim_end().to_string();
        }
    }
    raw_text.to_string()
}

/// Char-safe prefix truncation.
pub fn truncate_text(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Deterministic text cleanup used before any agent sees the input:
/// normalize PDF formatting, drop the metadata head, drop the references
/// tail. Pure; empty only when the input was empty or pure boilerplate.
pub fn build_analysis_context(raw_text: &str) -> String {
    let cleaned = normalize_text(raw_text);
    let cleaned = strip_meta_head(&cleaned);
    strip_references_tail(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejoins_hyphenated_line_breaks() {
        let text = "transfor-\nmer models improve perfor-\n mance";
        assert_eq!(
            normalize_text(text),
            "transformer models improve performance"
        );
    }

    #[test]
    fn collapses_whitespace_and_blank_runs() {
        let text = "a   b\t c\n\n\n\n\nd";
        assert_eq!(normalize_text(text), "a b c\n\nd");
    }

    #[test]
    fn strips_contact_and_affiliation_lines() {
        let text = "A Study of Things\nJane Doe, John Smith\njane@example.org\nDepartment of Computing, Example University\nAbstract\nWe study things.";
        let cleaned = strip_meta_head(text);
        assert!(cleaned.contains("A Study of Things"));
        assert!(cleaned.contains("Abstract"));
        assert!(cleaned.contains("We study things."));
        assert!(!cleaned.contains("jane@example.org"));
        assert!(!cleaned.contains("Example University"));
        assert!(!cleaned.contains("Jane Doe"));
    }

    #[test]
    fn drops_a_long_references_tail_but_keeps_a_short_one() {
        let body = "Main text.\n\nReferences\n";
        let long_tail = "x".repeat(900);
        let trimmed = strip_references_tail(&format!("{body}{long_tail}"));
        assert_eq!(trimmed, "Main text.");

        let short = format!("{body}one citation");
        assert_eq!(strip_references_tail(&short), short);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_text("αβγδ", 2), "αβ");
        assert_eq!(truncate_text("short", 100), "short");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(build_analysis_context(""), "");
    }
}
