use crate::admin::{RuleLine, Summary, TestResult};
use serde_json::json;

/// Rule listing followed by usage hints.
pub fn summary_pretty(summary: &Summary) -> String {
    format!(
        "{}\n💡 use `regex-filter add` to add a rule\n💡 use `regex-filter toggle` to switch the filter on or off",
        summary
    )
}

/// Rule listing as structured JSON.
pub fn summary_json(summary: &Summary) -> String {
    let lines = |lines: &[RuleLine], secondary: &str| -> Vec<serde_json::Value> {
        lines
            .iter()
            .map(|l| {
                let mut entry = json!({
                    "index": l.index,
                    "enabled": l.enabled,
                    "value": l.primary,
                });
                entry[secondary] = json!(l.secondary);
                entry
            })
            .collect()
    };

    let output = json!({
        "enabled": summary.enabled,
        "replace": lines(&summary.replace, "replacement"),
        "delete": lines(&summary.delete, "description"),
        "append": lines(&summary.append, "position"),
    });
    to_pretty(&output)
}

pub fn test_pretty(result: &TestResult) -> String {
    let verdict = if result.changed {
        "✅ text was modified"
    } else {
        "➖ text is unchanged"
    };
    format!(
        "🧪 rule test\n\noriginal:\n{}\n\ntransformed:\n{}\n\n{}",
        result.original, result.transformed, verdict
    )
}

pub fn test_json(result: &TestResult) -> String {
    to_pretty(&json!({
        "original": result.original,
        "transformed": result.transformed,
        "changed": result.changed,
    }))
}

fn to_pretty(value: &serde_json::Value) -> String {
    // A `Value` always serializes.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Summary {
        Summary {
            enabled: false,
            replace: vec![RuleLine {
                index: 1,
                enabled: true,
                primary: "a".into(),
                secondary: "b".into(),
            }],
            delete: vec![],
            append: vec![RuleLine {
                index: 1,
                enabled: false,
                primary: "\n\nsig".into(),
                secondary: "end".into(),
            }],
        }
    }

    #[test]
    fn pretty_listing() {
        let text = summary_pretty(&summary());
        assert!(text.starts_with("🔧 regex filter: 🔴 disabled"));
        assert!(text.contains("1. ✅ 'a' -> 'b'"));
        assert!(text.contains("delete rules (0 active / 0 total):\n  (none)"));
        assert!(text.contains("1. ❌ suffix '\\n\\nsig'"));
        assert!(text.contains("regex-filter add"));
    }

    #[test]
    fn json_listing() {
        let value: serde_json::Value = serde_json::from_str(&summary_json(&summary())).unwrap();
        assert_eq!(value["enabled"], false);
        assert_eq!(value["replace"][0]["index"], 1);
        assert_eq!(value["replace"][0]["value"], "a");
        assert_eq!(value["replace"][0]["replacement"], "b");
        assert_eq!(value["delete"].as_array().unwrap().len(), 0);
        assert_eq!(value["append"][0]["position"], "end");
        assert_eq!(value["append"][0]["enabled"], false);
    }

    #[test]
    fn test_report() {
        let result = TestResult {
            original: "x问题".into(),
            transformed: "x".into(),
            changed: true,
        };
        let text = test_pretty(&result);
        assert!(text.contains("original:\nx问题"));
        assert!(text.contains("transformed:\nx\n"));
        assert!(text.ends_with("✅ text was modified"));

        let value: serde_json::Value = serde_json::from_str(&test_json(&result)).unwrap();
        assert_eq!(value["changed"], true);
    }
}
