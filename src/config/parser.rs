//! Snapshot parser for loading want/have trees.
//!
//! Snapshots are YAML documents. JSON is accepted as well, both through the
//! YAML path (JSON is a YAML subset) and through a dedicated entry point that
//! reports JSON-specific error positions.

use crate::error::{ConfigError, Result, StpError};
use std::path::Path;
use tracing::{debug, info};

use super::model::StpConfig;
use crate::planner::normalize::expand_ranges;

/// Parser for spanning-tree configuration snapshots.
#[derive(Debug, Default)]
pub struct ConfigParser;

impl ConfigParser {
    /// Creates a new snapshot parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a snapshot from a file.
    ///
    /// Files ending in `.json` go through the JSON parser, everything else
    /// through the YAML parser.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<StpConfig> {
        let path = path.as_ref();
        info!("Loading snapshot from: {}", path.display());

        if !path.exists() {
            return Err(StpError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            self.parse_json(&content, Some(path))
        } else {
            self.parse_yaml(&content, Some(path))
        }
    }

    /// Loads a snapshot from an optional file; `None` yields the empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_optional(&self, path: Option<&Path>) -> Result<StpConfig> {
        path.map_or_else(|| Ok(StpConfig::new()), |p| self.load_file(p))
    }

    /// Parses a snapshot from a YAML string.
    ///
    /// An empty document is the empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<StpConfig> {
        debug!("Parsing YAML snapshot");

        if is_blank_document(content) {
            return Ok(StpConfig::new());
        }

        let raw: serde_json::Value = serde_yaml::from_str(content).map_err(|e| {
            StpError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })?;

        let config = expand_ranges(raw).map_err(|e| match e {
            StpError::Config(ConfigError::ParseError {
                message,
                location: None,
            }) => StpError::Config(ConfigError::ParseError {
                message,
                location: source.map(|p| p.display().to_string()),
            }),
            other => other,
        })?;
        debug!("Parsed snapshot with {} section(s)", config.section_count());
        Ok(config)
    }

    /// Parses a snapshot from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn parse_json(&self, content: &str, source: Option<&Path>) -> Result<StpConfig> {
        debug!("Parsing JSON snapshot");

        if content.trim().is_empty() {
            return Ok(StpConfig::new());
        }

        let config: Option<StpConfig> = serde_json::from_str(content).map_err(|e| {
            StpError::Config(ConfigError::ParseError {
                message: format!("JSON parse error: {e}"),
                location: source.map_or_else(
                    || Some(format!("line {}, column {}", e.line(), e.column())),
                    |p| Some(format!("{}:{}:{}", p.display(), e.line(), e.column())),
                ),
            })
        })?;

        let config = config.unwrap_or_default();
        debug!("Parsed snapshot with {} section(s)", config.section_count());
        Ok(config)
    }
}

/// True if the document holds nothing but whitespace, comments and markers.
fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StpProtocol;
    use std::io::Write;

    #[test]
    fn test_parse_empty_document() {
        let parser = ConfigParser::new();
        assert!(parser.parse_yaml("", None).unwrap().is_empty());
        assert!(parser.parse_yaml("---\n# nothing\n", None).unwrap().is_empty());
        assert!(parser.parse_yaml("~", None).unwrap().is_empty());
        assert!(parser.parse_json("  ", None).unwrap().is_empty());
    }

    #[test]
    fn test_parse_yaml_snapshot() {
        let yaml = r"
global:
  enabled_protocol: pvst
  portfast: true
pvst:
  - vlan_id: 1
    hello_time: 5
";
        let config = ConfigParser::new().parse_yaml(yaml, None).unwrap();
        assert_eq!(config.enabled_protocol(), Some(StpProtocol::Pvst));
        assert_eq!(config.pvst.len(), 1);
    }

    #[test]
    fn test_malformed_vlan_is_parse_error() {
        let yaml = r"
global:
  disabled_vlans: ['12-10']
";
        let err = ConfigParser::new().parse_yaml(yaml, None).unwrap_err();
        assert!(err.is_parse());

        let err = ConfigParser::new()
            .parse_yaml(yaml, Some(Path::new("want.yaml")))
            .unwrap_err();
        match err {
            StpError::Config(ConfigError::ParseError { location, .. }) => {
                assert_eq!(location.as_deref(), Some("want.yaml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_json_error_location() {
        let err = ConfigParser::new()
            .parse_json(r#"{"global": {"loop_guard": "yes"}}"#, None)
            .unwrap_err();
        match err {
            StpError::Config(ConfigError::ParseError { location, .. }) => {
                assert!(location.unwrap().starts_with("line 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("want.yaml");
        let mut file = std::fs::File::create(&yaml_path).unwrap();
        writeln!(file, "interfaces:\n  - intf_name: Ethernet0\n    cost: 4").unwrap();

        let json_path = dir.path().join("have.json");
        std::fs::write(&json_path, r#"{"mstp": {"mst_name": "r1"}}"#).unwrap();

        let parser = ConfigParser::new();
        let want = parser.load_file(&yaml_path).unwrap();
        assert_eq!(want.interfaces.len(), 1);

        let have = parser.load_file(&json_path).unwrap();
        assert_eq!(have.mstp.unwrap().mst_name.as_deref(), Some("r1"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigParser::new().load_file(dir.path().join("absent.yaml"));
        assert!(matches!(
            result,
            Err(StpError::Config(ConfigError::FileNotFound { .. }))
        ));

        assert!(ConfigParser::new().load_optional(None).unwrap().is_empty());
    }
}
