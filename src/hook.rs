use crate::engine::TransformEngine;
use crate::store::RuleStore;

const PREVIEW_CHARS: usize = 100;

/// Result of filtering one outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub content: String,
    pub changed: bool,
}

/// Bridges a message pipeline to the transform engine.
///
/// The rule set is read from the store on every message so edits made through
/// the administrator take effect immediately.
#[derive(Debug, Clone)]
pub struct MessageFilter {
    store: RuleStore,
    engine: TransformEngine,
}

impl MessageFilter {
    pub fn new(store: RuleStore) -> Self {
        Self {
            store,
            engine: TransformEngine::new(),
        }
    }

    pub fn process(&self, text: &str) -> FilterOutcome {
        let set = self.store.load();
        if !set.enabled {
            log::debug!("rule set disabled, message passed through");
            return FilterOutcome {
                content: text.to_string(),
                changed: false,
            };
        }
        if text.is_empty() {
            return FilterOutcome {
                content: String::new(),
                changed: false,
            };
        }

        let chars = text.chars().count();
        if chars > set.advanced.max_content_length {
            log::debug!(
                "message of {} chars exceeds max_content_length {}",
                chars,
                set.advanced.max_content_length
            );
        }

        let content = self.engine.apply(text, &set);
        let changed = content != text;
        if changed {
            if set.advanced.log_changes {
                log::info!(
                    "message filtered: '{}...' -> '{}...'",
                    preview(text),
                    preview(&content)
                );
            } else {
                log::info!(
                    "message filtered, length {} -> {}",
                    text.len(),
                    content.len()
                );
            }
        }
        FilterOutcome { content, changed }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppendRule, Position, RuleSet};

    fn filter_with(set: &RuleSet) -> (tempfile::TempDir, MessageFilter) {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("config.toml"));
        store.save(set).unwrap();
        (dir, MessageFilter::new(store))
    }

    #[test]
    fn filters_with_stored_rules() {
        let mut set = RuleSet::default();
        set.append_rules.push(AppendRule::new("\n\n——来自MaiBot", Position::End));
        let (_dir, filter) = filter_with(&set);

        let out = filter.process("这个问题不可以解决");
        assert!(out.changed);
        assert_eq!(out.content, "这个可以解决\n\n——来自MaiBot");
    }

    #[test]
    fn disabled_set_passes_through() {
        let mut set = RuleSet::default();
        set.enabled = false;
        let (_dir, filter) = filter_with(&set);

        let out = filter.process("  问题  ");
        assert!(!out.changed);
        assert_eq!(out.content, "  问题  ");
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let filter = MessageFilter::new(RuleStore::new(dir.path().join("absent.toml")));
        assert_eq!(filter.process("太坏了").content, "太好了");
    }

    #[test]
    fn unchanged_message_reports_no_change() {
        let (_dir, filter) = filter_with(&RuleSet::empty());
        let out = filter.process("hello world");
        assert!(!out.changed);
        assert_eq!(out.content, "hello world");
        assert!(!filter.process("").changed);
    }

    #[test]
    fn long_messages_are_still_processed() {
        let mut set = RuleSet::default();
        set.advanced.max_content_length = 3;
        let (_dir, filter) = filter_with(&set);
        assert_eq!(filter.process("不可以不可以").content, "可以可以");
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let text = "字".repeat(150);
        assert_eq!(preview(&text).chars().count(), 100);
    }
}
