use crate::admin::RuleAdministrator;
use crate::cli::format;
use crate::cli::{Commands, OutputFormat};
use crate::config::{Position, RuleKind};
use crate::error::AdminError;
use crate::hook::MessageFilter;
use crate::store::RuleStore;
use std::io::{self, Read};

const ADD_USAGE: &str = "\
📝 usage:
regex-filter add <pattern> <replacement>   add a replace rule
regex-filter add <pattern>                 add a delete rule
regex-filter add --append <text>           add a suffix rule
regex-filter add --prepend <text>          add a prefix rule

examples:
regex-filter add 不可以 可以
regex-filter add 问题
regex-filter add --append '\\n\\n——来自MaiBot'";

/// Human-readable outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub message: String,
    pub success: bool,
    /// The failure came from reading or writing the rule set file.
    pub storage_error: bool,
}

impl CommandReport {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            storage_error: false,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            storage_error: false,
        }
    }

    fn from_error(context: &str, err: &AdminError) -> Self {
        Self {
            message: format!("❌ {}: {}", context, err),
            success: false,
            storage_error: err.is_storage(),
        }
    }

    /// 0 on success, 1 for a rejected request, 2 when the rule set file could not be used.
    pub fn exit_code(&self) -> i32 {
        match (self.success, self.storage_error) {
            (true, _) => 0,
            (false, false) => 1,
            (false, true) => 2,
        }
    }
}

/// Run one command against the rule set stored at `store`.
pub fn run(command: Commands, store: &RuleStore) -> CommandReport {
    let admin = RuleAdministrator::new(store.clone());

    match command {
        Commands::List { format: output } => {
            let summary = admin.list();
            CommandReport::ok(match output {
                OutputFormat::Pretty => format::summary_pretty(&summary),
                OutputFormat::Json => format::summary_json(&summary),
            })
        }
        Commands::Add {
            pattern,
            replacement,
            append,
            prepend,
        } => add(&admin, pattern, replacement, append, prepend),
        Commands::Remove { kind, index } => {
            let kind = RuleKind::from(kind);
            match admin.remove(kind, index) {
                Ok(()) => CommandReport::ok(format!("✅ removed {} rule #{}", kind, index)),
                Err(e) => CommandReport::from_error("failed to remove rule", &e),
            }
        }
        Commands::Toggle => match admin.toggle() {
            Ok(true) => CommandReport::ok("🟢 regex filter enabled"),
            Ok(false) => CommandReport::ok("🔴 regex filter disabled"),
            Err(e) => CommandReport::from_error("failed to toggle regex filter", &e),
        },
        Commands::Test { text, format: output } => {
            let result = admin.test(&text.join(" "));
            CommandReport::ok(match output {
                OutputFormat::Pretty => format::test_pretty(&result),
                OutputFormat::Json => format::test_json(&result),
            })
        }
        Commands::Apply { text } => {
            let text = match text {
                Some(t) => t,
                None => {
                    let mut buf = String::new();
                    if let Err(e) = io::stdin().read_to_string(&mut buf) {
                        return CommandReport::failed(format!("❌ failed to read stdin: {}", e));
                    }
                    buf
                }
            };
            let outcome = MessageFilter::new(store.clone()).process(&text);
            CommandReport::ok(outcome.content)
        }
    }
}

fn add(
    admin: &RuleAdministrator,
    pattern: Option<String>,
    replacement: Vec<String>,
    append: Option<String>,
    prepend: Option<String>,
) -> CommandReport {
    if let Some(content) = append {
        let content = expand_escapes(&content);
        return match admin.add_append(&content, Position::End) {
            Ok(n) => CommandReport::ok(format!(
                "✅ added suffix rule #{}: '{}'",
                n,
                content.escape_debug()
            )),
            Err(e) => CommandReport::from_error("failed to add suffix rule", &e),
        };
    }
    if let Some(content) = prepend {
        let content = expand_escapes(&content);
        return match admin.add_append(&content, Position::Start) {
            Ok(n) => CommandReport::ok(format!(
                "✅ added prefix rule #{}: '{}'",
                n,
                content.escape_debug()
            )),
            Err(e) => CommandReport::from_error("failed to add prefix rule", &e),
        };
    }

    let Some(pattern) = pattern else {
        return CommandReport::ok(ADD_USAGE);
    };

    if replacement.is_empty() {
        match admin.add_delete(&pattern) {
            Ok(n) => CommandReport::ok(format!("✅ added delete rule #{}:\ndelete '{}'", n, pattern)),
            Err(e) => CommandReport::from_error("failed to add rule", &e),
        }
    } else {
        let replacement = replacement.join(" ");
        match admin.add_replace(&pattern, &replacement) {
            Ok(n) => CommandReport::ok(format!(
                "✅ added replace rule #{}:\n'{}' -> '{}'",
                n, pattern, replacement
            )),
            Err(e) => CommandReport::from_error("failed to add rule", &e),
        }
    }
}

/// Expand `\n`, `\t`, `\r` and `\\` so multi-line append content can be typed on one line.
/// Other backslash sequences are kept as written.
pub fn expand_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
