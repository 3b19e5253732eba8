//! Letter-choice extraction from free-form model text.

use once_cell::sync::Lazy;
use regex::Regex;

static FINAL_ANSWER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Final Answer[:\s]*\b([A-D])\b").expect("final answer regex"));

static STANDALONE_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([A-D])\b").expect("standalone letter regex"));

/// Extract the answered letter from a model response.
///
/// Prefers the last letter following a `Final Answer` marker, since
/// step-by-step responses mention candidate letters while reasoning before
/// committing. Falls back to the last standalone A-D anywhere in the text.
/// Returns `None` when no letter is found; matching is case-insensitive and
/// the result is always upper case.
pub fn parse_choice(text: &str) -> Option<String> {
    if let Some(caps) = FINAL_ANSWER_RE.captures_iter(text).last() {
        return Some(caps[1].to_uppercase());
    }
    STANDALONE_LETTER_RE
        .captures_iter(text)
        .last()
        .map(|caps| caps[1].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_letter() {
        assert_eq!(parse_choice("B"), Some("B".to_string()));
    }

    #[test]
    fn test_final_answer_marker_wins_over_stray_letters() {
        let text = "Option A looks plausible, but the rule forbids it.\nFinal Answer: B";
        assert_eq!(parse_choice(text), Some("B".to_string()));
    }

    #[test]
    fn test_last_final_answer_marker_wins() {
        let text = "Final Answer: A\nWait, correcting myself.\nFinal Answer: C";
        assert_eq!(parse_choice(text), Some("C".to_string()));
    }

    #[test]
    fn test_fallback_takes_last_standalone_letter() {
        let text = "It could be A or maybe C. I will go with C";
        assert_eq!(parse_choice(text), Some("C".to_string()));
    }

    #[test]
    fn test_lowercase_normalized() {
        assert_eq!(parse_choice("final answer: d"), Some("D".to_string()));
        assert_eq!(parse_choice("the answer is b"), Some("B".to_string()));
    }

    #[test]
    fn test_letters_inside_words_ignored() {
        assert_eq!(parse_choice("Abandon all bets"), None);
    }

    #[test]
    fn test_no_letter_returns_none() {
        assert_eq!(parse_choice("I cannot determine the answer."), None);
        assert_eq!(parse_choice(""), None);
    }

    #[test]
    fn test_letter_out_of_alphabet_ignored() {
        assert_eq!(parse_choice("The answer is E"), None);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let parsed = parse_choice("Final Answer: A").unwrap();
        assert_eq!(parse_choice(&parsed), Some(parsed.clone()));
    }
}
