use crate::config::RuleSet;
use crate::error::RuleApplyError;
use crate::rules::TextRule;
use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*").unwrap());
static HORIZONTAL_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static LINE_START_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]+").unwrap());
static LINE_END_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());

/// Applies a rule set to message text.
///
/// Stages run in a fixed order: replace, delete, append, then whitespace
/// normalization. A rule that fails to compile is logged and skipped; the
/// remaining rules still run.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransformEngine;

impl TransformEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run every stage over `input`.
    ///
    /// Returns `input` unchanged when the rule set is disabled or the input is empty.
    pub fn apply(&self, input: &str, rule_set: &RuleSet) -> String {
        if !rule_set.enabled || input.is_empty() {
            return input.to_string();
        }

        let mut buffer = input.to_string();
        buffer = run_stage(buffer, &rule_set.replace_rules);
        buffer = run_stage(buffer, &rule_set.delete_rules);
        buffer = run_stage(buffer, &rule_set.append_rules);
        normalize_whitespace(&buffer)
    }

    /// Replace and delete stages only, for previewing rules against sample text.
    ///
    /// Append rules and normalization are left out, and the global enabled flag is ignored.
    pub fn preview(&self, input: &str, rule_set: &RuleSet) -> String {
        let buffer = run_stage(input.to_string(), &rule_set.replace_rules);
        run_stage(buffer, &rule_set.delete_rules)
    }
}

fn run_stage<R: TextRule>(mut buffer: String, rules: &[R]) -> String {
    for (idx, rule) in rules.iter().enumerate() {
        if !rule.is_enabled() {
            continue;
        }
        match rule.apply(&buffer) {
            Ok(out) => {
                // Borrowed means no match; keep the current allocation.
                if let std::borrow::Cow::Owned(changed) = out {
                    log::debug!("{} rule #{} changed the text", rule.kind(), idx + 1);
                    buffer = changed;
                }
            }
            Err(source) => {
                let err = RuleApplyError {
                    kind: rule.kind(),
                    position: idx + 1,
                    pattern: rule.pattern().to_string(),
                    source,
                };
                log::warn!("{}", err);
            }
        }
    }
    buffer
}

/// Tidy whitespace left behind by the rule stages.
///
/// Trims the ends, collapses runs of blank lines to one blank line, collapses
/// spaces and tabs to a single space, and strips spaces and tabs at line edges.
pub fn normalize_whitespace(content: &str) -> String {
    let content = content.trim();
    if content.is_empty() {
        return String::new();
    }
    let content = BLANK_LINES.replace_all(content, "\n\n");
    let content = HORIZONTAL_RUN.replace_all(&content, " ");
    let content = LINE_START_SPACE.replace_all(&content, "\n");
    let content = LINE_END_SPACE.replace_all(&content, "\n");
    content.trim().to_string()
}
