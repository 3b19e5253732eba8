//! Prompt construction for the two evaluation styles.
//!
//! Every scenario is posed the same way: a style-specific system
//! instruction, then one user message carrying the rule, the question, the
//! labeled choices, and a style-specific answering postamble.

use serde::{Deserialize, Serialize};

use crate::dataset::Scenario;
use crate::providers::ChatMessage;

const DIRECT_INSTRUCTION: &str = "You are evaluating conditional rules in hypothetical \
scenarios. Ignore all real-world facts and comply exactly with the rule provided.";

const COT_INSTRUCTION: &str = "You are evaluating conditional rules in hypothetical \
scenarios. Ignore all real-world facts and comply exactly with the rule provided. \
Think step-by-step to verify the rule before answering.";

const DIRECT_POSTAMBLE: &str =
    "Respond with the single capital letter (A, B, C, or D) for your chosen option.";

const COT_POSTAMBLE: &str = "Explain your reasoning briefly, then provide \
`Final Answer: <letter>` on a new line with a single capital letter.";

/// How a model is asked to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    /// Answer with a bare letter.
    Direct,
    /// Reason first, then give a `Final Answer:` line.
    Cot,
}

impl std::fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PromptStyle::Direct => "direct",
            PromptStyle::Cot => "cot",
        };
        write!(f, "{}", name)
    }
}

impl PromptStyle {
    pub fn instruction(&self) -> &'static str {
        match self {
            PromptStyle::Direct => DIRECT_INSTRUCTION,
            PromptStyle::Cot => COT_INSTRUCTION,
        }
    }

    pub fn postamble(&self) -> &'static str {
        match self {
            PromptStyle::Direct => DIRECT_POSTAMBLE,
            PromptStyle::Cot => COT_POSTAMBLE,
        }
    }
}

/// Build the two-message prompt for one scenario under one style.
pub fn build_messages(style: PromptStyle, scenario: &Scenario) -> Vec<ChatMessage> {
    let mut choice_lines = String::new();
    for (label, text) in &scenario.choices {
        choice_lines.push_str(label);
        choice_lines.push_str(") ");
        choice_lines.push_str(text);
        choice_lines.push('\n');
    }

    let user = format!(
        "Rule:\n{}\n\nQuestion:\n{}\n\nChoices:\n{}\n{}",
        scenario.rule,
        scenario.question,
        choice_lines,
        style.postamble()
    );

    vec![
        ChatMessage::system(style.instruction()),
        ChatMessage::user(&user),
    ]
}
