//! Scenario dataset for the conditional-forgetting benchmark.
//!
//! Scenarios redefine a familiar rule and ask whether the model applies
//! the stated rule instead of its real-world prior. Three domains:
//!
//! - `chess`: variant piece-movement rules over fixed move cases
//! - `arithmetic`: redefined operators over fixed operand lists
//! - `protocol`: social/workplace conventions with inverted defaults
//!
//! `store` handles JSONL persistence for the built dataset.
//!
//! Building is pure enumeration of hard-coded tables: no input, no
//! randomness, identical output on every run.

pub mod arithmetic;
pub mod chess;
pub mod protocol;
pub mod store;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Option labels, assigned in order. A scenario uses a prefix of these.
pub const CHOICE_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// The only answer shape this benchmark uses.
pub const ANSWER_TYPE_MULTIPLE_CHOICE: &str = "multiple_choice";

// ---------------------------------------------------------------------------
// Scenario types
// ---------------------------------------------------------------------------

/// Which rule family a scenario belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Chess,
    Math,
    Protocol,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Domain::Chess => "chess",
            Domain::Math => "math",
            Domain::Protocol => "protocol",
        };
        write!(f, "{}", s)
    }
}

/// One benchmark case: a redefined rule, a question about it, and a
/// multiple-choice answer set with a single correct label.
///
/// Invariants (upheld by construction, checked in tests):
/// `correct_choice` is a key of `choices`; `choices` holds 2 to 4 entries
/// labeled with a prefix of [`CHOICE_LABELS`]; `id` is unique across the
/// dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub domain: Domain,
    pub rule: String,
    pub question: String,
    /// Label -> option text. A `BTreeMap` keeps serialization in label
    /// order, so dataset bytes are reproducible.
    pub choices: BTreeMap<String, String>,
    pub correct_choice: String,
    pub answer_type: String,
    pub metadata: serde_json::Value,
}

impl Scenario {
    /// Option text for the correct label, if present.
    pub fn correct_text(&self) -> Option<&str> {
        self.choices.get(&self.correct_choice).map(|s| s.as_str())
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the full dataset in canonical order: chess, arithmetic, protocol.
pub fn build_scenarios() -> Vec<Scenario> {
    let mut scenarios = chess::build();
    scenarios.extend(arithmetic::build());
    scenarios.extend(protocol::build());
    scenarios
}
