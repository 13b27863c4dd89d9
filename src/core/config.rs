//! Run configuration loaded from a JSON file.
//!
//! ```json
//! {
//!   "select": ["chapters/*.md"],
//!   "restore": "out",
//!   "mappings": { "宋乐安": ["杨宁清", "宁清"] },
//!   "paraEndings": ["  \n", "\n\n"],
//!   "minUpdate": true,
//!   "keepWrappings": true,
//!   "wrapWidth": 78
//! }
//! ```
//!
//! Older lowercase and snake_case spellings of each key are accepted too.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::rewrap::{MappingTable, ParagraphEndingSet, WrapPolicy, DEFAULT_TARGET_WIDTH, DEFAULT_TOLERANCE};
use crate::utils::io;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    select: Option<OneOrMany>,
    #[serde(default)]
    mappings: Option<Map<String, Value>>,
    #[serde(default)]
    restore: Option<String>,
    #[serde(default, alias = "paraendings", alias = "para_endings")]
    para_endings: Vec<String>,
    #[serde(default, alias = "min_update")]
    min_update: bool,
    #[serde(default, alias = "keepwrappings", alias = "keep_wrappings")]
    keep_wrappings: bool,
    #[serde(default, alias = "altwrappinglength", alias = "wrap_width")]
    wrap_width: Option<i64>,
    #[serde(default)]
    tolerance: Option<i64>,
    #[serde(default, alias = "join_lines")]
    join_lines: bool,
}

/// A validated configuration, ready to drive a run.
#[derive(Debug, Clone)]
pub struct ReplaceConfig {
    /// The config file this was loaded from.
    pub path: PathBuf,
    /// Glob patterns, already resolved against the config file's directory.
    pub select: Vec<String>,
    /// Mirror directory for output. `None` rewrites files in place.
    pub restore: Option<PathBuf>,
    pub min_update: bool,
    pub mappings: MappingTable,
    pub para_endings: ParagraphEndingSet,
    pub policy: WrapPolicy,
}

pub fn load(path: &Path) -> Result<ReplaceConfig> {
    let content = io::read_file(path)?;
    parse(&content, path)
}

/// Parse config JSON. `path` names the file in errors and anchors relative paths.
pub fn parse(content: &str, path: &Path) -> Result<ReplaceConfig> {
    let display = path.display().to_string();
    let raw: RawConfig =
        serde_json::from_str(content).map_err(|e| Error::config_invalid_json(&display, e))?;

    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let select = raw
        .select
        .ok_or_else(|| Error::config_missing_key("select", Some(display.clone())))?
        .into_vec();
    if select.iter().all(|s| s.trim().is_empty()) {
        return Err(Error::config_invalid_value(
            "select",
            None,
            "At least one file pattern is required",
        ));
    }
    let select = select
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| resolve_path(s, base).to_string_lossy().into_owned())
        .collect();

    let mappings = raw
        .mappings
        .ok_or_else(|| Error::config_missing_key("mappings", Some(display.clone())))?;
    let mappings = MappingTable::new(mapping_entries(mappings)?)?;

    let restore = raw
        .restore
        .filter(|r| !r.trim().is_empty())
        .map(|r| resolve_path(&r, base));

    let para_endings = ParagraphEndingSet::new(raw.para_endings)?;

    let target_width = match raw.wrap_width {
        None => DEFAULT_TARGET_WIDTH,
        Some(w) if w > 0 => w as usize,
        Some(w) => {
            return Err(Error::config_invalid_value(
                "wrapWidth",
                Some(w.to_string()),
                "Wrap width must be a positive number of columns",
            ))
        }
    };
    let tolerance = match raw.tolerance {
        None => DEFAULT_TOLERANCE,
        Some(t) if t >= 0 && (t as usize) < target_width => t as usize,
        Some(t) => {
            return Err(Error::config_invalid_value(
                "tolerance",
                Some(t.to_string()),
                format!("Tolerance must be between 0 and {}", target_width - 1),
            ))
        }
    };

    Ok(ReplaceConfig {
        path: path.to_path_buf(),
        select,
        restore,
        min_update: raw.min_update,
        mappings,
        para_endings,
        policy: WrapPolicy {
            preserve_wrapping: raw.keep_wrappings,
            target_width,
            tolerance,
            join_lines: raw.join_lines,
        },
    })
}

fn mapping_entries(mappings: Map<String, Value>) -> Result<Vec<(String, Vec<String>)>> {
    mappings
        .into_iter()
        .map(|(canonical, value)| {
            let aliases = match value {
                Value::String(alias) => vec![alias],
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(alias) => Ok(alias),
                        other => Err(Error::config_invalid_value(
                            format!("mappings.{}", canonical),
                            Some(other.to_string()),
                            "Aliases must be strings",
                        )),
                    })
                    .collect::<Result<Vec<_>>>()?,
                other => {
                    return Err(Error::config_invalid_value(
                        format!("mappings.{}", canonical),
                        Some(other.to_string()),
                        "Expected a list of aliases",
                    ))
                }
            };
            Ok((canonical, aliases))
        })
        .collect()
}

/// Expand `~` and anchor relative paths at `base`.
pub fn resolve_path(raw: &str, base: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(raw).to_string();
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse_at(json: &str) -> Result<ReplaceConfig> {
        parse(json, Path::new("/work/words.json"))
    }

    #[test]
    fn parses_full_config_with_legacy_keys() {
        let config = parse_at(
            r#"{
                "select": "../folder/*.md",
                "restore": "out",
                "mappings": { "康飞": ["秦阳"], "宋乐安": ["杨宁清", "宁清"] },
                "paraendings": ["  \n", "\n\n"],
                "min_update": true,
                "keepwrappings": true,
                "altwrappinglength": 60
            }"#,
        )
        .unwrap();

        assert_eq!(config.select, vec!["/work/../folder/*.md".to_string()]);
        assert_eq!(config.restore, Some(PathBuf::from("/work/out")));
        assert!(config.min_update);
        assert_eq!(config.para_endings.markers(), ["  \n", "\n\n"]);
        assert!(config.policy.preserve_wrapping);
        assert_eq!(config.policy.target_width, 60);
        assert_eq!(config.policy.tolerance, DEFAULT_TOLERANCE);
    }

    #[test]
    fn mapping_order_is_preserved() {
        let config = parse_at(r#"{"select": ["*.txt"], "mappings": {"Z": ["z"], "A": ["a"], "M": "m"}}"#)
            .unwrap();
        let names: Vec<&str> = config
            .mappings
            .entries()
            .iter()
            .map(|(canonical, _)| canonical.as_str())
            .collect();
        assert_eq!(names, ["Z", "A", "M"]);
    }

    #[test]
    fn defaults_apply_when_optional_keys_are_absent() {
        let config = parse_at(r#"{"select": ["*.txt"], "mappings": {}}"#).unwrap();
        assert_eq!(config.restore, None);
        assert!(!config.min_update);
        assert!(config.para_endings.is_empty());
        assert_eq!(config.policy, WrapPolicy::default());
    }

    #[test]
    fn empty_restore_means_in_place() {
        let config =
            parse_at(r#"{"select": ["*.txt"], "mappings": {}, "restore": ""}"#).unwrap();
        assert_eq!(config.restore, None);
    }

    #[test]
    fn missing_keys_are_reported() {
        let err = parse_at(r#"{"mappings": {}}"#).unwrap_err();
        assert_eq!(err.code.as_str(), "config.missing_key");
        assert_eq!(err.details["key"], "select");

        let err = parse_at(r#"{"select": "*.txt"}"#).unwrap_err();
        assert_eq!(err.details["key"], "mappings");
    }

    #[test]
    fn malformed_json_is_invalid_json() {
        let err = parse_at(r#"{"select": "#).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
        assert_eq!(err.details["path"], "/work/words.json");
    }

    #[test]
    fn non_positive_wrap_width_is_rejected() {
        let err = parse_at(r#"{"select": "*.txt", "mappings": {}, "wrapWidth": 0}"#).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
        assert_eq!(err.details["key"], "wrapWidth");
    }

    #[test]
    fn non_string_alias_is_rejected() {
        let err = parse_at(r#"{"select": "*.txt", "mappings": {"A": [1]}}"#).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
        assert_eq!(err.details["key"], "mappings.A");
    }

    #[test]
    fn empty_alias_is_a_pattern_error() {
        let err = parse_at(r#"{"select": "*.txt", "mappings": {"A": [""]}}"#).unwrap_err();
        assert_eq!(err.code.as_str(), "pattern.invalid");
    }

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(
            resolve_path("/abs/*.md", Path::new("/base")),
            PathBuf::from("/abs/*.md")
        );
        assert_eq!(
            resolve_path("rel/*.md", Path::new("/base")),
            PathBuf::from("/base/rel/*.md")
        );
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        fs::write(&path, r#"{"select": "*.md", "mappings": {"B": ["b"]}}"#).unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.select, vec![dir.path().join("*.md").to_string_lossy().into_owned()]);
        assert_eq!(config.mappings.owner_of("b"), Some("B"));
    }

    #[test]
    fn load_reports_unreadable_file() {
        let err = load(Path::new("/nonexistent/words.json")).unwrap_err();
        assert_eq!(err.code.as_str(), "file.read_failed");
        assert_eq!(err.details["path"], "/nonexistent/words.json");
    }
}
