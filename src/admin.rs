use crate::config::{AppendRule, DeleteRule, Position, ReplaceRule, RuleKind, RuleSet};
use crate::engine::TransformEngine;
use crate::error::AdminError;
use crate::rules;
use crate::store::RuleStore;
use std::fmt;

/// One numbered line of a rule listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine {
    /// 1-based, as accepted by `remove`.
    pub index: usize,
    pub enabled: bool,
    /// Pattern for replace/delete rules, content for append rules.
    pub primary: String,
    /// Replacement, description or position depending on the kind.
    pub secondary: String,
}

impl RuleLine {
    pub fn glyph(&self) -> &'static str {
        if self.enabled {
            "✅"
        } else {
            "❌"
        }
    }
}

/// Snapshot of the stored rule set for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub enabled: bool,
    pub replace: Vec<RuleLine>,
    pub delete: Vec<RuleLine>,
    pub append: Vec<RuleLine>,
}

impl Summary {
    fn from_rule_set(set: &RuleSet) -> Self {
        let replace = set
            .replace_rules
            .iter()
            .enumerate()
            .map(|(i, r)| RuleLine {
                index: i + 1,
                enabled: r.enabled,
                primary: r.pattern.clone(),
                secondary: r.replacement.clone(),
            })
            .collect();
        let delete = set
            .delete_rules
            .iter()
            .enumerate()
            .map(|(i, r)| RuleLine {
                index: i + 1,
                enabled: r.enabled,
                primary: r.pattern.clone(),
                secondary: r.description.clone().unwrap_or_default(),
            })
            .collect();
        let append = set
            .append_rules
            .iter()
            .enumerate()
            .map(|(i, r)| RuleLine {
                index: i + 1,
                enabled: r.enabled,
                primary: r.content.clone(),
                secondary: r.position.as_str().to_string(),
            })
            .collect();
        Self {
            enabled: set.enabled,
            replace,
            delete,
            append,
        }
    }

    pub fn lines(&self, kind: RuleKind) -> &[RuleLine] {
        match kind {
            RuleKind::Replace => &self.replace,
            RuleKind::Delete => &self.delete,
            RuleKind::Append => &self.append,
        }
    }

    /// Number of rules of `kind` that take part in transforms.
    pub fn active(&self, kind: RuleKind) -> usize {
        self.lines(kind).iter().filter(|l| l.enabled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.replace.is_empty() && self.delete.is_empty() && self.append.is_empty()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.enabled {
            "🟢 enabled"
        } else {
            "🔴 disabled"
        };
        writeln!(f, "🔧 regex filter: {}", status)?;

        if self.is_empty() {
            writeln!(f)?;
            return writeln!(f, "📝 no rules configured");
        }

        for kind in [RuleKind::Replace, RuleKind::Delete, RuleKind::Append] {
            let lines = self.lines(kind);
            writeln!(f)?;
            writeln!(
                f,
                "{} {} rules ({} active / {} total):",
                section_icon(kind),
                kind,
                self.active(kind),
                lines.len()
            )?;
            if lines.is_empty() {
                writeln!(f, "  (none)")?;
                continue;
            }
            for line in lines {
                match kind {
                    RuleKind::Replace => writeln!(
                        f,
                        "{}. {} '{}' -> '{}'",
                        line.index,
                        line.glyph(),
                        line.primary,
                        line.secondary
                    )?,
                    RuleKind::Delete => {
                        writeln!(f, "{}. {} delete '{}'", line.index, line.glyph(), line.primary)?
                    }
                    RuleKind::Append => {
                        let label = if line.secondary == Position::Start.as_str() {
                            "prefix"
                        } else {
                            "suffix"
                        };
                        writeln!(
                            f,
                            "{}. {} {} '{}'",
                            line.index,
                            line.glyph(),
                            label,
                            line.primary.escape_debug()
                        )?
                    }
                }
            }
        }
        Ok(())
    }
}

fn section_icon(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::Replace => "🔄",
        RuleKind::Delete => "🗑️",
        RuleKind::Append => "➕",
    }
}

/// Outcome of previewing the stored rules against sample text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub original: String,
    pub transformed: String,
    pub changed: bool,
}

/// Edits the stored rule set.
///
/// Each operation reloads from the store, changes the rules in memory and saves
/// the whole set back. Nothing is cached between calls. Two operations racing on
/// the same file resolve as last-writer-wins.
#[derive(Debug, Clone)]
pub struct RuleAdministrator {
    store: RuleStore,
    engine: TransformEngine,
}

impl RuleAdministrator {
    pub fn new(store: RuleStore) -> Self {
        Self {
            store,
            engine: TransformEngine::new(),
        }
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    pub fn list(&self) -> Summary {
        Summary::from_rule_set(&self.store.load())
    }

    /// Append a replace rule and return its 1-based index.
    pub fn add_replace(&self, pattern: &str, replacement: &str) -> Result<usize, AdminError> {
        rules::validate_pattern(pattern)?;
        self.mutate(|set| {
            set.replace_rules.push(ReplaceRule::new(pattern, replacement));
            Ok(set.replace_rules.len())
        })
        .inspect(|_| log::info!("added replace rule '{}' -> '{}'", pattern, replacement))
    }

    /// Append a delete rule and return its 1-based index.
    pub fn add_delete(&self, pattern: &str) -> Result<usize, AdminError> {
        rules::validate_pattern(pattern)?;
        self.mutate(|set| {
            set.delete_rules.push(DeleteRule::new(pattern));
            Ok(set.delete_rules.len())
        })
        .inspect(|_| log::info!("added delete rule '{}'", pattern))
    }

    /// Append a prefix or suffix rule and return its 1-based index. Content is literal.
    pub fn add_append(&self, content: &str, position: Position) -> Result<usize, AdminError> {
        if content.is_empty() {
            let label = match position {
                Position::Start => "prefix",
                Position::End => "suffix",
            };
            return Err(AdminError::EmptyContent(label));
        }
        self.mutate(|set| {
            set.append_rules.push(AppendRule::new(content, position));
            Ok(set.append_rules.len())
        })
        .inspect(|_| {
            log::info!(
                "added {} rule '{}'",
                position.as_str(),
                content.escape_debug()
            )
        })
    }

    /// Remove the rule at 1-based `index` from the `kind` list.
    pub fn remove(&self, kind: RuleKind, index: i64) -> Result<(), AdminError> {
        self.mutate(|set| {
            let len = set.len_of(kind);
            let idx = usize::try_from(index)
                .ok()
                .filter(|&i| i >= 1 && i <= len)
                .map(|i| i - 1)
                .ok_or(AdminError::IndexOutOfRange { kind, index, len })?;
            match kind {
                RuleKind::Replace => {
                    set.replace_rules.remove(idx);
                }
                RuleKind::Delete => {
                    set.delete_rules.remove(idx);
                }
                RuleKind::Append => {
                    set.append_rules.remove(idx);
                }
            }
            Ok(())
        })
        .inspect(|_| log::info!("removed {} rule #{}", kind, index))
    }

    /// Flip the global enabled flag and return the new state.
    pub fn toggle(&self) -> Result<bool, AdminError> {
        self.mutate(|set| {
            set.enabled = !set.enabled;
            Ok(set.enabled)
        })
        .inspect(|enabled| log::info!("rule set {}", if *enabled { "enabled" } else { "disabled" }))
    }

    /// Run the replace and delete stages of the stored rules over `text` without saving anything.
    pub fn test(&self, text: &str) -> TestResult {
        let set = self.store.load();
        let transformed = self.engine.preview(text, &set);
        TestResult {
            changed: transformed != text,
            original: text.to_string(),
            transformed,
        }
    }

    /// Load, apply `change`, save. The file is only written when `change` succeeds.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut RuleSet) -> Result<T, AdminError>,
    ) -> Result<T, AdminError> {
        let mut set = self.store.load_strict()?;
        let out = change(&mut set)?;
        self.store.save(&set)?;
        Ok(out)
    }
}
