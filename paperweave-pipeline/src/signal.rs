use std::sync::OnceLock;

use regex::Regex;

use crate::state::{round3, QuantReport, QuantSignal};

/// Exact sentence the reader writes when a paper has no numbers; the merge
/// logic treats it as an empty Results section.
pub const RESULTS_PLACEHOLDER: &str = "No quantitative metrics reported in provided text.";

const METRIC_KEYWORDS: &[&str] = &[
    "table", "%", "p=", "p<", "±", "≈", "accuracy", "f1", "rouge", "bleu", "em", "auc",
];

const MAX_NUMBER_SAMPLES: usize = 6;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\d+(?:[.,]\d+)?(?:\s*[±≈]\s*\d+)?(?:\s*%|(?:\s*(?:p=|p<)\s*\d*[.,]?\d+))?")
            .unwrap()
    })
}

fn metric_context() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(accuracy|f1|rouge|bleu|em|auc|precision|recall|score|table)").unwrap()
    })
}

fn results_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)(Results:\s*)(.*?)(\n[A-Z][A-Za-z/ ]+:|\z)").unwrap()
    })
}

fn confidence_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)Confidence\s*:\s*[^\n]+").unwrap())
}

fn first_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap())
}

fn first_integer() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?\d+").unwrap())
}

/// Years and page-number-looking values are not metrics.
fn is_plausible_metric_number(number_text: &str) -> bool {
    let digits: String = number_text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return false;
    }
    if digits.len() == 4 {
        if let Ok(year) = digits.parse::<u32>() {
            if (1800..=2100).contains(&year) {
                return false;
            }
        }
    }
    true
}

/// Heuristic classifier: does this text plausibly carry quantitative
/// results? Numbers (filtered for years) beat keyword hits beat nothing.
pub fn detect_quantitative_signal(text: &str) -> QuantReport {
    if text.trim().is_empty() {
        return QuantReport {
            signal: QuantSignal::No,
            label: "NO (no quantitative signal detected)".to_string(),
            keyword_hits: Vec::new(),
            number_samples: Vec::new(),
        };
    }

    let lowered = text.to_lowercase();
    let mut keyword_hits = Vec::new();
    for keyword in METRIC_KEYWORDS {
        let hit = if *keyword == "%" {
            text.contains('%')
        } else {
            lowered.contains(keyword)
        };
        if hit {
            keyword_hits.push((*keyword).to_string());
        }
    }

    let mut number_samples = Vec::new();
    for found in number_pattern().find_iter(text) {
        if !is_plausible_metric_number(found.as_str()) {
            continue;
        }
        let start = found.start().saturating_sub(20);
        let end = (found.end() + 20).min(text.len());
        let start = snap_to_char_boundary(text, start);
        let end = snap_to_char_boundary(text, end);
        number_samples.push(text[start..end].trim().to_string());
        if number_samples.len() >= MAX_NUMBER_SAMPLES {
            break;
        }
    }

    let context_hits = number_samples
        .iter()
        .filter(|sample| metric_context().is_match(sample))
        .count();

    let (signal, label) = if !number_samples.is_empty() || context_hits > 0 {
        (QuantSignal::Yes, "YES (numbers detected)")
    } else if !keyword_hits.is_empty() {
        (QuantSignal::Maybe, "MAYBE (tables/metric keywords detected)")
    } else {
        (QuantSignal::No, "NO (no quantitative signal detected)")
    };

    QuantReport {
        signal,
        label: label.to_string(),
        keyword_hits,
        number_samples,
    }
}

fn snap_to_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index.min(text.len())
}

fn extract_results_section(notes_text: &str) -> String {
    match results_block().captures(notes_text) {
        Some(caps) => caps[2].trim().to_string(),
        None => notes_text.to_string(),
    }
}

/// Counts the quantitative-looking lines in the notes' Results section.
pub fn count_numeric_results(notes_text: &str) -> usize {
    let block = extract_results_section(notes_text);
    if block.is_empty() {
        return 0;
    }
    block
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| detect_quantitative_signal(line).signal == QuantSignal::Yes)
        .count()
}

/// Pulls the `Confidence: <level> - <reason>` line out of a meta-summary.
pub fn extract_confidence_line(meta_text: &str) -> String {
    confidence_line()
        .find(meta_text)
        .map(|found| found.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Parses the critic's rubric into a routing score in [0, 1].
///
/// Grammar: the first numeric token in the text. Tokens at or above 1.0 are
/// read on the critic's 0-5 rubric scale and divided by 5 (a rubric line of
/// "Coherence: 1" means 1-of-5, not a perfect 1.0); everything is clamped
/// to [0, 1]. When no number parses, `fallback` (a previously computed
/// positive quality score) wins over the 0.5 default.
pub fn extract_critic_score(critic_text: &str, fallback: Option<f64>) -> f64 {
    let parsed = first_number()
        .find(critic_text)
        .and_then(|found| found.as_str().parse::<f64>().ok());
    match parsed {
        Some(value) if value >= 1.0 => round3((value / 5.0).clamp(0.0, 1.0)),
        Some(value) => round3(value.clamp(0.0, 1.0)),
        None => {
            let score = match fallback {
                Some(value) if value > 0.0 => value,
                _ => 0.5,
            };
            round3(score.clamp(0.0, 1.0))
        }
    }
}

/// Parses a judge reply into [0, 5]: first integer, clamped; garbage is 0.
pub fn parse_judge_score(reply: &str) -> f64 {
    first_integer()
        .find(reply)
        .and_then(|found| found.as_str().parse::<f64>().ok())
        .map(|score| score.clamp(0.0, 5.0))
        .unwrap_or(0.0)
}

/// Merges recovered metric bullets into the notes' Results section.
///
/// Gap-fill only: a placeholder or empty section is replaced, an existing
/// section gains the bullets it does not already contain, and nothing
/// pre-existing is ever deleted. A recovery with no usable bullet lines
/// leaves the notes byte-identical.
pub fn merge_recovered_results(notes_text: &str, recovered_text: &str) -> String {
    let bullets: Vec<&str> = recovered_text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-') || line.starts_with('•'))
        .filter(|line| detect_quantitative_signal(line).signal == QuantSignal::Yes)
        .collect();
    if bullets.is_empty() {
        return notes_text.to_string();
    }

    match results_block().captures(notes_text) {
        Some(caps) => {
            let section = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            let existing = section.trim();
            let is_placeholder = existing.is_empty() || existing == RESULTS_PLACEHOLDER;
            let merged = if is_placeholder {
                bullets.join("\n")
            } else {
                let mut lines: Vec<String> =
                    existing.lines().map(|line| line.to_string()).collect();
                for bullet in &bullets {
                    if !lines.iter().any(|line| line.trim() == *bullet) {
                        lines.push((*bullet).to_string());
                    }
                }
                lines.join("\n")
            };
            let span = caps.get(2).map(|m| m.range()).unwrap_or(0..0);
            let mut rebuilt = String::with_capacity(notes_text.len() + merged.len());
            rebuilt.push_str(&notes_text[..span.start]);
            rebuilt.push_str(&merged);
            if !notes_text[span.end..].starts_with('\n') && !notes_text[span.end..].is_empty() {
                rebuilt.push('\n');
            }
            rebuilt.push_str(&notes_text[span.end..]);
            rebuilt
        }
        None => {
            let mut rebuilt = notes_text.trim_end().to_string();
            rebuilt.push_str("\n\nResults:\n");
            rebuilt.push_str(&bullets.join("\n"));
            rebuilt
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_numbers_as_a_yes_signal() {
        let report = detect_quantitative_signal("Accuracy reached 87.3% on the test split.");
        assert_eq!(report.signal, QuantSignal::Yes);
        assert!(report.keyword_hits.contains(&"%".to_string()));
        assert!(!report.number_samples.is_empty());
    }

    #[test]
    fn bare_years_do_not_count_as_numbers() {
        let report = detect_quantitative_signal("Published in 2023, this work builds on 2021.");
        assert!(report.number_samples.is_empty());
        assert_eq!(report.signal, QuantSignal::No);
    }

    #[test]
    fn metric_keywords_without_numbers_are_maybe() {
        let report = detect_quantitative_signal("See the accuracy table for details.");
        assert_eq!(report.signal, QuantSignal::Maybe);
    }

    #[test]
    fn plain_prose_is_no() {
        let report = detect_quantitative_signal("This work proposes a new method.");
        assert_eq!(report.signal, QuantSignal::No);
        assert_eq!(detect_quantitative_signal("   ").signal, QuantSignal::No);
    }

    #[test]
    fn counts_numeric_lines_in_the_results_section_only() {
        let notes = "Title: A Paper\nResults:\n- SQuAD: F1=88.5\n- GLUE: Acc=91.2%\nno metric in this line\nContributions: a new method\nLimitations: small corpus from 2021";
        assert_eq!(count_numeric_results(notes), 2);
    }

    #[test]
    fn placeholder_results_count_zero() {
        let notes = format!("Title: T\nResults:\n{RESULTS_PLACEHOLDER}\nLimitations: none");
        assert_eq!(count_numeric_results(&notes), 0);
    }

    #[test]
    fn critic_score_reads_the_first_number_on_a_five_scale() {
        assert_eq!(extract_critic_score("Coherence: 4\nGroundedness: 2", None), 0.8);
        assert_eq!(extract_critic_score("Coherence: 1\nGroundedness: 1", None), 0.2);
        // Sub-unit values are already on the routing scale.
        assert_eq!(extract_critic_score("Score: 0.7 overall", None), 0.7);
    }

    #[test]
    fn critic_score_clamps_arbitrary_input() {
        assert_eq!(extract_critic_score("rated 17 out of 5", None), 1.0);
        assert_eq!(extract_critic_score("minus nothing here", None), 0.5);
        assert_eq!(extract_critic_score("", None), 0.5);
        for text in ["9999", "0", "3.5", "0.2", "no numbers at all"] {
            let score = extract_critic_score(text, None);
            assert!((0.0..=1.0).contains(&score), "{text} -> {score}");
        }
    }

    #[test]
    fn critic_score_prefers_a_positive_quality_fallback() {
        assert_eq!(extract_critic_score("no digits", Some(0.72)), 0.72);
        assert_eq!(extract_critic_score("no digits", Some(0.0)), 0.5);
        // A parseable number always wins over the fallback.
        assert_eq!(extract_critic_score("4 of 5", Some(0.1)), 0.8);
    }

    #[test]
    fn judge_score_parses_and_clamps() {
        assert_eq!(parse_judge_score("4"), 4.0);
        assert_eq!(parse_judge_score("I'd say 3, maybe 4."), 3.0);
        assert_eq!(parse_judge_score("-2"), 0.0);
        assert_eq!(parse_judge_score("42"), 5.0);
        assert_eq!(parse_judge_score("no verdict"), 0.0);
        assert_eq!(parse_judge_score("__TIMEOUT__"), 0.0);
    }

    #[test]
    fn confidence_line_is_extracted_case_insensitively() {
        let meta = "Title: T\n...\nconfidence: High - grounded numbers\ntrailing";
        assert_eq!(
            extract_confidence_line(meta),
            "confidence: High - grounded numbers"
        );
        assert_eq!(extract_confidence_line("nothing here"), "");
    }

    #[test]
    fn merge_replaces_a_placeholder_section() {
        let notes = format!("Title: T\nResults:\n{RESULTS_PLACEHOLDER}\nLimitations: none");
        let merged = merge_recovered_results(&notes, "- SQuAD: F1=88.5\nchatter");
        assert!(merged.contains("- SQuAD: F1=88.5"));
        assert!(!merged.contains(RESULTS_PLACEHOLDER));
        assert!(merged.contains("Limitations: none"));
    }

    #[test]
    fn merge_appends_without_deleting_existing_results() {
        let notes = "Title: T\nResults:\n- GLUE: Acc=91.2%\nLimitations: none";
        let merged = merge_recovered_results(notes, "- SQuAD: F1=88.5\n- GLUE: Acc=91.2%");
        assert!(merged.contains("- GLUE: Acc=91.2%"));
        assert!(merged.contains("- SQuAD: F1=88.5"));
        assert_eq!(merged.matches("- GLUE: Acc=91.2%").count(), 1);
        assert!(merged.contains("Limitations: none"));
    }

    #[test]
    fn merge_with_nothing_recoverable_is_identity() {
        let notes = "Title: T\nResults:\n- GLUE: Acc=91.2%\nLimitations: none";
        assert_eq!(merge_recovered_results(notes, RESULTS_PLACEHOLDER), notes);
        assert_eq!(merge_recovered_results(notes, "__TIMEOUT__"), notes);
        assert_eq!(merge_recovered_results(notes, ""), notes);
    }

    #[test]
    fn merge_adds_a_results_section_when_notes_lack_one() {
        let notes = "Title: T\nObjective: study things";
        let merged = merge_recovered_results(notes, "- SQuAD: F1=88.5");
        assert!(merged.contains("Results:\n- SQuAD: F1=88.5"));
        assert!(merged.starts_with("Title: T\nObjective: study things"));
    }
}
