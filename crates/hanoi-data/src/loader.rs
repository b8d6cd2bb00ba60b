//! Config file discovery and deserialization.
//!
//! A config can be written as RON, TOML or JSON; the format is detected from
//! the file extension.

use std::path::{Path, PathBuf};

use hanoi_core::ConfigError;
use hanoi_core::config::SimConfig;
use serde::de::DeserializeOwned;

use crate::schema::{ConfigData, UnrepresentableValue};

/// Base name of the config file looked up by [`load_config`].
pub const CONFIG_BASE_NAME: &str = "hanoi";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// No config file was found in the given directory.
    #[error("no '{base}' config file found in {dir}")]
    Missing { base: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A number in the file cannot be represented in fixed point.
    #[error("value out of range in {file}: {source}")]
    OutOfRange {
        file: PathBuf,
        source: UnrepresentableValue,
    },

    /// The file parsed but describes an unusable configuration.
    #[error("invalid config in {file}: {source}")]
    Invalid { file: PathBuf, source: ConfigError },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Look for `{base_name}.ron`, `.toml` and `.json` in `dir`.
///
/// Returns `Ok(None)` if none exists and `ConflictingFormats` if more than
/// one does.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;
    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }
    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its extension.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format).map_err(|detail| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    })
}

/// Deserialize `content` in the given format. Errors are rendered as text.
pub fn deserialize_str<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, String> {
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

// ===========================================================================
// Entry points
// ===========================================================================

/// Load and validate a config from a specific file.
pub fn load_config_file(path: &Path) -> Result<SimConfig, DataLoadError> {
    let data: ConfigData = deserialize_file(path)?;
    let config = data
        .into_config()
        .map_err(|source| DataLoadError::OutOfRange {
            file: path.to_path_buf(),
            source,
        })?;
    config.validate().map_err(|source| DataLoadError::Invalid {
        file: path.to_path_buf(),
        source,
    })?;
    Ok(config)
}

/// Load and validate `hanoi.{ron,toml,json}` from `dir`.
pub fn load_config(dir: &Path) -> Result<SimConfig, DataLoadError> {
    let path = find_data_file(dir, CONFIG_BASE_NAME)?.ok_or_else(|| DataLoadError::Missing {
        base: CONFIG_BASE_NAME,
        dir: dir.to_path_buf(),
    })?;
    load_config_file(&path)
}

/// Like [`load_config`], but a missing file yields the default config.
pub fn load_config_or_default(dir: &Path) -> Result<SimConfig, DataLoadError> {
    match load_config(dir) {
        Err(DataLoadError::Missing { .. }) => Ok(SimConfig::default()),
        other => other,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hanoi_core::fixed::f64_to_fixed64;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "hanoi_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn detect_formats() {
        assert_eq!(detect_format(Path::new("a.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), Format::Json);
        assert!(matches!(
            detect_format(Path::new("a.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn load_ron_partial_config() {
        let dir = make_test_dir("ron");
        fs::write(
            dir.join("hanoi.ron"),
            "(timing: (lift: 0.5, drop: 0.25), disks: (max: 8))",
        )
        .unwrap();

        let config = load_config(&dir).unwrap();
        assert_eq!(config.timing.lift, f64_to_fixed64(0.5));
        assert_eq!(config.timing.drop, f64_to_fixed64(0.25));
        assert_eq!(config.timing.transport, f64_to_fixed64(1.0));
        assert_eq!(config.disk_counts.max, 8);
        cleanup(&dir);
    }

    #[test]
    fn load_toml_config() {
        let dir = make_test_dir("toml");
        fs::write(
            dir.join("hanoi.toml"),
            concat!(
                "pegs = [[-3.0, 0.0, 0.0], [0.0, 0.0, 0.0], [3.0, 0.0, 0.0]]\n",
                "\n[geometry]\nthickness = 0.5\n",
            ),
        )
        .unwrap();

        let config = load_config(&dir).unwrap();
        assert_eq!(config.geometry.thickness, f64_to_fixed64(0.5));
        assert_eq!(config.anchors.0[0].x, f64_to_fixed64(-3.0));
        cleanup(&dir);
    }

    #[test]
    fn load_json_config() {
        let dir = make_test_dir("json");
        fs::write(dir.join("hanoi.json"), r#"{"disks": {"min": 3, "max": 6, "default": 4}}"#)
            .unwrap();
        let config = load_config(&dir).unwrap();
        assert_eq!(config.disk_counts.min, 3);
        assert_eq!(config.disk_counts.default, 4);
        cleanup(&dir);
    }

    #[test]
    fn conflicting_formats_rejected() {
        let dir = make_test_dir("conflict");
        fs::write(dir.join("hanoi.ron"), "()").unwrap();
        fs::write(dir.join("hanoi.json"), "{}").unwrap();
        assert!(matches!(
            load_config(&dir),
            Err(DataLoadError::ConflictingFormats { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = make_test_dir("missing");
        assert!(matches!(
            load_config(&dir),
            Err(DataLoadError::Missing { .. })
        ));
        assert_eq!(load_config_or_default(&dir).unwrap(), SimConfig::default());
        cleanup(&dir);
    }

    #[test]
    fn parse_error_names_file() {
        let dir = make_test_dir("parse");
        let path = dir.join("hanoi.ron");
        fs::write(&path, "(timing: (lift: \"fast\"))").unwrap();
        match load_config(&dir) {
            Err(DataLoadError::Parse { file, .. }) => assert_eq!(file, path),
            other => panic!("expected parse error, got {other:?}"),
        }
        cleanup(&dir);
    }

    #[test]
    fn oversized_number_is_an_error() {
        let dir = make_test_dir("overflow");
        let path = dir.join("hanoi.toml");
        fs::write(&path, "[geometry]\nthickness = 1e12\n").unwrap();
        match load_config(&dir) {
            Err(DataLoadError::OutOfRange { file, source }) => {
                assert_eq!(file, path);
                assert_eq!(source.field, "thickness");
            }
            other => panic!("expected out-of-range error, got {other:?}"),
        }
        cleanup(&dir);
    }

    #[test]
    fn non_finite_number_is_an_error() {
        let dir = make_test_dir("nan");
        fs::write(dir.join("hanoi.toml"), "[timing]\nlift = nan\n").unwrap();
        assert!(matches!(
            load_config(&dir),
            Err(DataLoadError::OutOfRange { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn invalid_values_rejected_after_parse() {
        let dir = make_test_dir("invalid");
        fs::write(dir.join("hanoi.ron"), "(timing: (settle: -1.0))").unwrap();
        assert!(matches!(
            load_config(&dir),
            Err(DataLoadError::Invalid {
                source: ConfigError::NegativeDuration { field: "settle" },
                ..
            })
        ));
        cleanup(&dir);
    }
}
