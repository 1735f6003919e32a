//! Per-workspace settings file.
//!
//! Holds the authentication artifacts captured by `getlit setup`. Keys this
//! tool does not know about are preserved on save.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GetlitError, Result};

/// Contents of the workspace settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_sig: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkp_public_key: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authentication artifacts required by network-facing commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub auth_sig: Value,
    pub pkp_public_key: String,
}

impl ProjectSettings {
    /// Read the settings file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GetlitError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| GetlitError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read the settings file, or start empty if it does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the settings file as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?;
        fs::write(path, format!("{}\n", content))?;
        Ok(())
    }

    /// The stored credentials, if both halves are present.
    pub fn credentials(&self) -> Option<Credentials> {
        let auth_sig = self.auth_sig.as_ref().filter(|v| !is_blank(v))?;
        let pkp_public_key = self
            .pkp_public_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())?;

        Some(Credentials {
            auth_sig: auth_sig.clone(),
            pkp_public_key: pkp_public_key.clone(),
        })
    }

    /// Store credentials, leaving other keys untouched.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.auth_sig = Some(credentials.auth_sig);
        self.pkp_public_key = Some(credentials.pkp_public_key);
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Gate for commands that need credentials.
///
/// # Errors
///
/// Returns `MissingCredentials` naming the file when it is absent or lacks
/// either artifact, and `ConfigParseError` when it is not valid JSON.
pub fn require_credentials(path: &Path) -> Result<Credentials> {
    let settings = match ProjectSettings::load(path) {
        Ok(settings) => settings,
        Err(GetlitError::ConfigNotFound { .. }) => {
            return Err(GetlitError::MissingCredentials {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e),
    };

    settings
        .credentials()
        .ok_or_else(|| GetlitError::MissingCredentials {
            path: path.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_file_fails_the_gate() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("getlit.json");
        assert!(matches!(
            require_credentials(&path),
            Err(GetlitError::MissingCredentials { .. })
        ));
    }

    #[test]
    fn empty_settings_fail_the_gate() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("getlit.json");
        fs::write(&path, "{}").unwrap();

        let err = require_credentials(&path).unwrap_err();
        assert!(err.to_string().contains("getlit setup"));
    }

    #[test]
    fn half_credentials_fail_the_gate() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("getlit.json");
        fs::write(&path, r#"{ "authSig": { "sig": "0x1" }, "pkpPublicKey": "" }"#).unwrap();

        assert!(require_credentials(&path).is_err());
    }

    #[test]
    fn complete_credentials_pass_the_gate() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("getlit.json");
        fs::write(
            &path,
            r#"{ "authSig": { "sig": "0x1" }, "pkpPublicKey": "0x04ab" }"#,
        )
        .unwrap();

        let credentials = require_credentials(&path).unwrap();
        assert_eq!(credentials.auth_sig, json!({ "sig": "0x1" }));
        assert_eq!(credentials.pkp_public_key, "0x04ab");
    }

    #[test]
    fn save_preserves_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("getlit.json");
        fs::write(&path, r#"{ "network": "cayenne" }"#).unwrap();

        let mut settings = ProjectSettings::load(&path).unwrap();
        settings.set_credentials(Credentials {
            auth_sig: json!({ "sig": "0x2" }),
            pkp_public_key: "0x04cd".into(),
        });
        settings.save(&path).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["network"], "cayenne");
        assert_eq!(raw["authSig"]["sig"], "0x2");
        assert_eq!(raw["pkpPublicKey"], "0x04cd");
    }

    #[test]
    fn load_or_default_starts_empty() {
        let temp = TempDir::new().unwrap();
        let settings = ProjectSettings::load_or_default(&temp.path().join("none.json")).unwrap();
        assert_eq!(settings, ProjectSettings::default());
    }
}
