use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for ticket submission.
///
/// Holds the ticketing-project coordinates used when projecting and
/// submitting tickets. The basic-auth password is deliberately not part
/// of the file; it is supplied through the environment at the CLI
/// boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Identifier of the ticketing project issues are filed under.
    pub project: String,

    /// Username recorded as the reporter on each created issue.
    pub reporter: String,

    /// Issue-creation endpoint URL of the ticketing API.
    pub endpoint: String,

    /// Basic-auth username for the ticketing API.
    pub username: String,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content
    /// is invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML
    /// or if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the
/// domain type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        project: String,

        #[serde(default)]
        reporter: String,

        #[serde(default)]
        endpoint: String,

        #[serde(default)]
        username: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                project,
                reporter,
                endpoint,
                username,
            } => Self {
                project,
                reporter,
                endpoint,
                username,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            project: config.project,
            reporter: config.reporter,
            endpoint: config.endpoint,
            username: config.username,
        }
    }
}
