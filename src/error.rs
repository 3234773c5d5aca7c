//! # Error Handling
//!
//! Centralized error handling for the `docsite` toolkit, built on
//! `thiserror`. Every anticipated failure mode has its own variant carrying
//! the context needed to print a useful message: the repository reference
//! for clone failures, the offending payload for unresolvable document
//! paths, the external tool name for delegated link checks.
//!
//! Two groups of variants matter for control flow:
//!
//! - `GitClone` and `NoDocsFound` abort a sync run when they occur on a
//!   required source; on an `optional` source they are caught at the
//!   per-source boundary, logged, and turned into a skipped outcome.
//! - `UnresolvableDocPath` always propagates. It indicates a configuration
//!   or integration bug, so the caller (the site build) must fail for that
//!   document rather than emit a broken edit link.

use thiserror::Error;

/// Main error type for docsite operations
#[derive(Error, Debug)]
pub enum Error {
    /// A source manifest or site configuration could not be parsed.
    ///
    /// Includes the specific parsing issue and optionally a hint about how
    /// to fix it.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An upstream repository could not be cloned.
    #[error("Git clone error for {repo}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        repo: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// A cloned repository contained no usable documentation for any of the
    /// configured copy strategies.
    #[error("No docs found in {repo}")]
    NoDocsFound { repo: String },

    /// The resolver could not derive a logical document path from its input.
    #[error("Unable to determine doc path for edit URL payload: {payload}")]
    UnresolvableDocPath { payload: String },

    /// The named content collection is not part of the site configuration.
    #[error("Unknown content collection: {collection}")]
    UnknownCollection { collection: String },

    /// An error occurred with a filesystem operation.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An error occurred with a path-related operation.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// A delegated external tool (site builder, link crawler) failed.
    #[error("{tool} failed: {message}")]
    Tool { tool: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let error = Error::Config {
            message: "Invalid YAML".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration error"));
        assert!(display.contains("Invalid YAML"));
    }

    #[test]
    fn test_error_display_config_with_hint() {
        let error = Error::Config {
            message: "Missing repo field".to_string(),
            hint: Some("Add 'repo:' to the source entry".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Missing repo field"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Add 'repo:'"));
    }

    #[test]
    fn test_error_display_git_clone() {
        let error = Error::GitClone {
            repo: "BrainDriveAI/BrainDrive-Core".to_string(),
            message: "Authentication failed".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Git clone error"));
        assert!(display.contains("BrainDriveAI/BrainDrive-Core"));
        assert!(display.contains("Authentication failed"));
    }

    #[test]
    fn test_error_display_git_clone_with_hint() {
        let error = Error::GitClone {
            repo: "BrainDriveAI/BrainDrive-Core".to_string(),
            message: "timed out".to_string(),
            hint: Some("Check network access".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("hint:"));
        assert!(display.contains("Check network access"));
    }

    #[test]
    fn test_error_display_no_docs_found() {
        let error = Error::NoDocsFound {
            repo: "BrainDriveAI/PluginTemplate".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("No docs found"));
        assert!(display.contains("BrainDriveAI/PluginTemplate"));
    }

    #[test]
    fn test_error_display_unresolvable_doc_path() {
        let error = Error::UnresolvableDocPath {
            payload: "{\"source\":null}".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Unable to determine doc path"));
        assert!(display.contains("{\"source\":null}"));
    }

    #[test]
    fn test_error_display_tool() {
        let error = Error::Tool {
            tool: "linkinator".to_string(),
            message: "exited with status 1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("linkinator failed"));
        assert!(display.contains("exited with status 1"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_str = "invalid: [unclosed";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: Error = yaml_error.into();
        let display = format!("{}", error);
        assert!(display.contains("YAML parsing error"));
    }

    #[test]
    fn test_error_from_regex_error() {
        let regex_error = regex::Error::Syntax("Invalid regex".to_string());
        let error: Error = regex_error.into();
        let display = format!("{}", error);
        assert!(display.contains("Regex error"));
    }
}
