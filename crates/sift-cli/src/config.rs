//! Guard policy resolution.
//!
//! Precedence, lowest first: built-in defaults, the `--config` file,
//! `SIFT_*` environment variables, explicit flags. Clap merges the last
//! two, so a flag always beats its environment variable.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use sift_query::GuardPolicy;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Limit flags shared by every command that compiles queries.
#[derive(Debug, Clone, Default, Args)]
pub struct PolicyArgs {
    /// Guard policy file (.json, otherwise YAML)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Maximum query length in characters
    #[arg(long, env = "SIFT_MAX_QUERY_LENGTH", global = true)]
    pub max_query_length: Option<usize>,

    /// Maximum number of tokens
    #[arg(long, env = "SIFT_MAX_TOKENS", global = true)]
    pub max_tokens: Option<usize>,

    /// Maximum number of search terms
    #[arg(long, env = "SIFT_MAX_CLAUSES", global = true)]
    pub max_clauses: Option<usize>,

    /// Maximum number of CNF clauses after distribution
    #[arg(long, env = "SIFT_MAX_CNF_CLAUSES", global = true)]
    pub max_cnf_clauses: Option<usize>,

    /// Report size metrics with compiled output
    #[arg(
        long,
        env = "SIFT_MEASURE",
        global = true,
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub measure: Option<bool>,
}

impl PolicyArgs {
    /// Builds the effective policy.
    pub fn resolve(&self) -> Result<GuardPolicy, ConfigError> {
        let mut policy = match &self.config {
            Some(path) => load_policy_file(path)?,
            None => GuardPolicy::default(),
        };

        if let Some(n) = self.max_query_length {
            policy.max_query_length = n;
        }
        if let Some(n) = self.max_tokens {
            policy.max_token_count = n;
        }
        if let Some(n) = self.max_clauses {
            policy.max_clause_leaf_count = n;
        }
        if let Some(n) = self.max_cnf_clauses {
            policy.max_cnf_clauses = n;
        }
        if let Some(on) = self.measure {
            policy.measure_chip_enabled = on;
        }

        tracing::debug!(?policy, "resolved guard policy");
        Ok(policy)
    }
}

/// Reads a policy file. Missing fields keep their defaults.
pub fn load_policy_file(path: &Path) -> Result<GuardPolicy, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_without_file_or_flags() {
        assert_eq!(PolicyArgs::default().resolve().unwrap(), GuardPolicy::default());
    }

    #[test]
    fn json_file_with_host_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "policy.json", r#"{"maxTokens": 12, "maxClauses": 4}"#);
        let policy = load_policy_file(&path).unwrap();
        assert_eq!(policy.max_token_count, 12);
        assert_eq!(policy.max_clause_leaf_count, 4);
        assert_eq!(policy.max_query_length, GuardPolicy::DEFAULT_MAX_QUERY_LENGTH);
    }

    #[test]
    fn yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "policy.yaml",
            "maxQueryLength: 80\nmaxCnfClauses: 16\nmeasureChipEnabled: true\n",
        );
        let policy = load_policy_file(&path).unwrap();
        assert_eq!(policy.max_query_length, 80);
        assert_eq!(policy.max_cnf_clauses, 16);
        assert!(policy.measure_chip_enabled);
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "policy.yml", "maxTokenCount: 30\nmaxQueryLength: 80\n");
        let args = PolicyArgs {
            config: Some(path),
            max_tokens: Some(7),
            measure: Some(true),
            ..PolicyArgs::default()
        };
        let policy = args.resolve().unwrap();
        assert_eq!(policy.max_token_count, 7);
        assert_eq!(policy.max_query_length, 80);
        assert!(policy.measure_chip_enabled);
    }

    #[test]
    fn bad_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "policy.json", "{not json");
        let err = load_policy_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("policy.json"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_policy_file(Path::new("/no/such/policy.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
