//! Arithmetic scenarios: standard operators with redefined meanings.
//!
//! Each group states a replacement definition (offset addition, boosted
//! multiplication, shifted squaring, difference "division"), computes the
//! correct value under that definition, and surrounds it with distractors
//! drawn from the real-world result and nearby values.

use std::collections::BTreeMap;

use serde_json::json;

use super::{Domain, Scenario, ANSWER_TYPE_MULTIPLE_CHOICE, CHOICE_LABELS};

// ---------------------------------------------------------------------------
// Choice assembly
// ---------------------------------------------------------------------------

/// Turn a candidate value list into labeled options plus the correct label.
///
/// Candidates are deduplicated preserving first occurrence; the correct
/// value is inserted at the front if a distractor formula swallowed it.
/// The first four survivors get labels in order. If the correct value was
/// truncated away, its label is recomputed from the pre-truncation count
/// and that option is overwritten with the correct value, even when the
/// slot already held a distractor.
pub(crate) fn multiple_choice_from_values(
    values: &[i64],
    correct: i64,
) -> (BTreeMap<String, String>, String) {
    let mut unique: Vec<i64> = Vec::new();
    for val in values {
        if !unique.contains(val) {
            unique.push(*val);
        }
    }
    if !unique.contains(&correct) {
        unique.insert(0, correct);
    }

    let mut options = BTreeMap::new();
    let mut correct_label: Option<&str> = None;
    for (label, val) in CHOICE_LABELS.iter().zip(unique.iter().take(4)) {
        options.insert(label.to_string(), val.to_string());
        if *val == correct {
            correct_label = Some(label);
        }
    }
    let correct_label = match correct_label {
        Some(label) => label.to_string(),
        None => {
            let label = CHOICE_LABELS[unique.len() % CHOICE_LABELS.len()];
            options.insert(label.to_string(), correct.to_string());
            label.to_string()
        }
    };
    (options, correct_label)
}

fn numeric_scenario(
    id: String,
    rule: &str,
    question: String,
    candidates: &[i64],
    correct: i64,
    metadata: serde_json::Value,
) -> Scenario {
    let (choices, correct_choice) = multiple_choice_from_values(candidates, correct);
    Scenario {
        id,
        domain: Domain::Math,
        rule: rule.to_string(),
        question,
        choices,
        correct_choice,
        answer_type: ANSWER_TYPE_MULTIPLE_CHOICE.to_string(),
        metadata,
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the 20 arithmetic scenarios: four operator groups, five cases each.
pub fn build() -> Vec<Scenario> {
    let mut scenarios = Vec::new();

    // Addition offset: a ⊕ b = a + b - 3.
    for (idx, (a, b)) in [(7, 6), (12, 9), (4, 15), (20, 13), (9, 2)].iter().enumerate() {
        let correct = a + b - 3;
        scenarios.push(numeric_scenario(
            format!("math_offset_add_{}", idx + 1),
            "Redefine addition: x ⊕ y = x + y - 3.",
            format!("What is {} ⊕ {}?", a, b),
            &[correct, correct + 3, correct - 3, correct + 5],
            correct,
            json!({ "operands": [a, b] }),
        ));
    }

    // Multiplication boost: a ⊗ b = (a × b) + 5.
    for (idx, (a, b)) in [(3, 4), (6, 5), (8, 2), (7, 7), (9, 3)].iter().enumerate() {
        let correct = a * b + 5;
        scenarios.push(numeric_scenario(
            format!("math_boost_mult_{}", idx + 1),
            "Redefine multiplication: x ⊗ y = (x × y) + 5.",
            format!("What is {} ⊗ {}?", a, b),
            &[correct, a * b, correct + 10, correct - 4],
            correct,
            json!({ "operands": [a, b] }),
        ));
    }

    // Square shift: sq(n) = n^2 - 10.
    for (idx, n) in [5, 9, 12, 4, 15].iter().enumerate() {
        let correct = n * n - 10;
        scenarios.push(numeric_scenario(
            format!("math_shift_square_{}", idx + 1),
            "Redefine squaring: sq(n) = n^2 - 10.",
            format!("What is sq({})?", n),
            &[correct, n * n, correct + 10, correct - 6],
            correct,
            json!({ "operand": n }),
        ));
    }

    // Division as absolute difference.
    for (idx, (a, b)) in [(9i64, 2), (25, 7), (18, 5), (11, 3), (30, 22)].iter().enumerate() {
        let correct = (a - b).abs();
        let real_quotient = if *b != 0 { a / b } else { 0 };
        scenarios.push(numeric_scenario(
            format!("math_diff_div_{}", idx + 1),
            "Redefine division: x ÷ y = |x - y|.",
            format!("What is {} ÷ {} under this rule?", a, b),
            &[correct, real_quotient, correct + 2, correct - 1],
            correct,
            json!({ "operands": [a, b] }),
        ));
    }

    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_ids() {
        let scenarios = build();
        assert_eq!(scenarios.len(), 20);
        assert_eq!(scenarios[0].id, "math_offset_add_1");
        assert_eq!(scenarios[19].id, "math_diff_div_5");
    }

    #[test]
    fn test_exactly_one_label_holds_correct_value() {
        for s in build() {
            let correct_text = s.correct_text().unwrap().to_string();
            let matching = s.choices.values().filter(|v| **v == correct_text).count();
            assert_eq!(matching, 1, "{}: correct value appears {} times", s.id, matching);
        }
    }

    #[test]
    fn test_offset_add_values() {
        let s = build().into_iter().find(|s| s.id == "math_offset_add_1").unwrap();
        // 7 (+) 6 = 10; distractors 13, 7, 15.
        assert_eq!(s.correct_text(), Some("10"));
        assert_eq!(s.correct_choice, "A");
        assert_eq!(s.choices.len(), 4);
    }

    #[test]
    fn test_shift_square_dedupes_distractors() {
        // sq(5) = 15; candidates [15, 25, 25, 9] collapse to three options.
        let s = build().into_iter().find(|s| s.id == "math_shift_square_1").unwrap();
        assert_eq!(s.choices.len(), 3);
        assert_eq!(s.correct_text(), Some("15"));
    }

    #[test]
    fn test_diff_div_uses_absolute_difference() {
        let s = build().into_iter().find(|s| s.id == "math_diff_div_1").unwrap();
        // 9 / 2 under the rule is |9 - 2| = 7, not 4.
        assert_eq!(s.correct_text(), Some("7"));
        assert!(s.choices.values().any(|v| v == "4"));
    }

    #[test]
    fn test_diff_div_values_across_operand_table() {
        let scenarios = build();
        let values: Vec<&str> = scenarios
            .iter()
            .filter(|s| s.id.starts_with("math_diff_div_"))
            .map(|s| s.correct_text().unwrap())
            .collect();
        assert_eq!(values, ["7", "18", "13", "8", "8"]);
    }

    #[test]
    fn test_choices_dedupe_preserves_first_occurrence() {
        let (options, label) = multiple_choice_from_values(&[10, 13, 10, 15], 10);
        assert_eq!(options.len(), 3);
        assert_eq!(label, "A");
        assert_eq!(options.get("A").map(String::as_str), Some("10"));
        assert_eq!(options.get("B").map(String::as_str), Some("13"));
        assert_eq!(options.get("C").map(String::as_str), Some("15"));
    }

    #[test]
    fn test_missing_correct_value_inserted_at_front() {
        let (options, label) = multiple_choice_from_values(&[4, 5, 6], 99);
        assert_eq!(label, "A");
        assert_eq!(options.get("A").map(String::as_str), Some("99"));
        assert_eq!(options.len(), 4);
    }

    #[test]
    fn test_truncated_correct_value_reassigns_label() {
        // Correct value sits fifth after dedup, so the four-option cut
        // drops it; its label comes from the pre-truncation count (5 % 4)
        // and overwrites the distractor at "B".
        let (options, label) = multiple_choice_from_values(&[5, 6, 7, 8, 9], 9);
        assert_eq!(label, "B");
        assert_eq!(options.get("B").map(String::as_str), Some("9"));
        assert_eq!(options.get("A").map(String::as_str), Some("5"));
        assert_eq!(options.get("C").map(String::as_str), Some("7"));
        assert_eq!(options.get("D").map(String::as_str), Some("8"));
    }
}
