use crate::cli::toml_config::TomlConfig;
use crate::config::RuleSet;
use crate::error::{ConfigLoadError, ConfigSaveError};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const FILE_HEADER: &str = "\
# regex-filter rule set
# Rules run in order: replace, delete, append. Whitespace is normalized last.
# Replacements may reference capture groups as $1 or ${name}.

";

/// Reads and writes the rule set at a fixed path.
///
/// Every save rewrites the whole file through a temp file in the same
/// directory, so readers see either the old or the new contents.
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored rule set. `Ok(None)` when no file exists yet.
    pub fn try_load(&self) -> Result<Option<RuleSet>, ConfigLoadError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigLoadError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let config: TomlConfig = toml::from_str(&text).map_err(|source| ConfigLoadError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(config.to_rule_set()))
    }

    /// Like `try_load`, with the default rule set standing in for a missing file.
    pub fn load_strict(&self) -> Result<RuleSet, ConfigLoadError> {
        Ok(self.try_load()?.unwrap_or_default())
    }

    /// Load for read-only use. Unreadable or malformed files are logged and replaced by defaults.
    pub fn load(&self) -> RuleSet {
        match self.load_strict() {
            Ok(set) => set,
            Err(e) => {
                log::warn!("{}; using default rules", e);
                RuleSet::default()
            }
        }
    }

    /// Write the full rule set, replacing the previous file atomically.
    pub fn save(&self, set: &RuleSet) -> Result<(), ConfigSaveError> {
        let body = toml::to_string(&TomlConfig::from_rule_set(set))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| ConfigSaveError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let write_err = |source: io::Error| ConfigSaveError::Write {
            path: self.path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(FILE_HEADER.as_bytes()).map_err(write_err)?;
        tmp.write_all(body.as_bytes()).map_err(write_err)?;
        // The temp file starts out owner-only; keep the mode of the file being replaced.
        match fs::metadata(&self.path) {
            Ok(meta) => tmp
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(write_err)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::debug!(
                "could not read permissions of {}: {}",
                self.path.display(),
                e
            ),
        }
        tmp.as_file().sync_all().map_err(write_err)?;

        tmp.persist(&self.path)
            .map_err(|e| ConfigSaveError::Persist {
                path: self.path.clone(),
                source: e.error,
            })?;

        log::info!("saved rule set to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppendRule, DeleteRule, Position, ReplaceRule};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("config.toml"));
        assert!(store.try_load().unwrap().is_none());
        assert_eq!(store.load(), RuleSet::default());
        assert_eq!(store.load_strict().unwrap(), RuleSet::default());
    }

    #[test]
    fn malformed_file_falls_back_but_strict_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[plugin\nenabled = ").unwrap();
        let store = RuleStore::new(&path);

        assert_eq!(store.load(), RuleSet::default());
        let err = store.load_strict().unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("config.toml"));

        let mut set = RuleSet::default();
        set.enabled = false;
        set.advanced.log_changes = true;
        set.advanced.max_content_length = 42;
        set.replace_rules[0].flags.ignore_case = true;
        set.delete_rules.push(DeleteRule::new(r"\s+$"));
        set.append_rules.push(AppendRule::new("\n\n——来自MaiBot", Position::End));
        set.append_rules.push(AppendRule::new("> ", Position::Start));

        store.save(&set).unwrap();
        assert_eq!(store.load_strict().unwrap(), set);
    }

    #[test]
    fn order_is_preserved_across_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("config.toml"));

        let mut set = RuleSet::empty();
        for i in 0..12 {
            set.replace_rules.push(ReplaceRule::new(format!("p{}", i), format!("r{}", i)));
        }
        store.save(&set).unwrap();
        let loaded = store.load_strict().unwrap();
        store.save(&loaded).unwrap();
        let reloaded = store.load_strict().unwrap();

        let patterns: Vec<_> = reloaded.replace_rules.iter().map(|r| r.pattern.clone()).collect();
        let expected: Vec<_> = (0..12).map(|i| format!("p{}", i)).collect();
        assert_eq!(patterns, expected);
        assert_eq!(reloaded, set);
    }

    #[test]
    fn awkward_strings_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("config.toml"));

        let mut set = RuleSet::empty();
        set.replace_rules.push(ReplaceRule::new(
            r#"say "(\w+)"\\"#,
            "quote:\t\"$1\"\r\n'''",
        ));
        set.append_rules.push(AppendRule::new("\u{7}bell\u{0}nul\"\\", Position::End));

        store.save(&set).unwrap();
        assert_eq!(store.load_strict().unwrap(), set);
    }

    #[test]
    fn empty_lists_survive() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("config.toml"));

        store.save(&RuleSet::empty()).unwrap();
        let loaded = store.load_strict().unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded, RuleSet::empty());
    }

    #[test]
    fn sections_are_written_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = RuleStore::new(&path);
        let mut set = RuleSet::default();
        set.append_rules.push(AppendRule::new("x", Position::End));
        store.save(&set).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# regex-filter rule set"));
        let plugin = text.find("[plugin]").unwrap();
        let replace = text.find("[[rules.replace_rules]]").unwrap();
        let delete = text.find("[[rules.delete_rules]]").unwrap();
        let append = text.find("[[rules.append_rules]]").unwrap();
        let advanced = text.find("[advanced]").unwrap();
        assert!(plugin < replace && replace < delete && delete < append && append < advanced);
    }

    #[test]
    fn empty_lists_do_not_break_section_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = RuleStore::new(&path);
        let mut set = RuleSet::default();
        set.delete_rules.clear();
        set.append_rules.push(AppendRule::new("x", Position::End));
        store.save(&set).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("delete_rules"));
        let plugin = text.find("[plugin]").unwrap();
        let replace = text.find("[[rules.replace_rules]]").unwrap();
        let append = text.find("[[rules.append_rules]]").unwrap();
        let advanced = text.find("[advanced]").unwrap();
        assert!(plugin < replace && replace < append && append < advanced);
        assert_eq!(store.load_strict().unwrap(), set);
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = RuleStore::new(&path);
        store.save(&RuleSet::default()).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut set = store.load_strict().unwrap();
        set.enabled = false;
        store.save(&set).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert!(!store.load_strict().unwrap().enabled);
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins").join("regex_filter").join("config.toml");
        let store = RuleStore::new(&path);
        store.save(&RuleSet::default()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn failed_save_leaves_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = RuleStore::new(&path);
        store.save(&RuleSet::default()).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // The parent "directory" is the existing config file.
        let blocked = RuleStore::new(path.join("nested.toml"));
        assert!(blocked.save(&RuleSet::empty()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(store.load_strict().unwrap(), RuleSet::default());
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("config.toml"));
        store.save(&RuleSet::default()).unwrap();
        store.save(&RuleSet::empty()).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
