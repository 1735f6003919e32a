//! Tool configuration schema.
//!
//! [`ToolConfig`] mirrors the camelCase JSON layout of `getlit.config.json`.
//! Keys that name directories or file extensions are optional at the type
//! level so that a missing key surfaces as a configuration error naming it
//! instead of silently resolving to a malformed path.

use serde::{Deserialize, Serialize};

use crate::error::{GetlitError, Result};

/// Process-wide settings, loaded once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    /// Directory name that identifies a project workspace.
    #[serde(default)]
    pub project_name: Option<String>,

    /// How many directory levels below the search root to scan.
    #[serde(default = "default_search_depth")]
    pub search_depth: u32,

    /// Command run when no token (or no similar token) is given.
    #[serde(default = "default_command")]
    pub default_command: String,

    /// Settings file name, relative to the workspace root.
    #[serde(default)]
    pub config_file: Option<String>,

    /// Embedded project template installed by `init`.
    #[serde(default = "default_template")]
    pub selected_template: String,

    /// Optional action schema path, relative to the workspace root.
    #[serde(default)]
    pub action_schema: Option<String>,

    #[serde(default)]
    pub build_config: BuildConfig,

    #[serde(default)]
    pub bundler: BundlerConfig,

    #[serde(default)]
    pub test_runner: TestRunnerConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    /// Port for the local auth-capture server.
    #[serde(default = "default_server_port")]
    pub temp_server_port: u16,

    /// Documentation URL opened by `docs`.
    #[serde(default = "default_docs_url")]
    pub docs_url: String,
}

/// Directory and extension names inside a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default)]
    pub src_dir: Option<String>,
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub test_dir: Option<String>,
    /// Suffix of action source files, e.g. `.action.ts`.
    #[serde(default)]
    pub in_file_ext: Option<String>,
    /// Suffix of bundled artifacts, e.g. `.action.js`.
    #[serde(default)]
    pub out_file_ext: Option<String>,
    /// Suffix of action test scripts, e.g. `.t.action.mjs`.
    #[serde(default)]
    pub test_file_ext: Option<String>,
}

/// External bundler invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    pub command: String,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            command: "esbuild".to_string(),
        }
    }
}

/// Runner used for action test scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunnerConfig {
    pub command: String,
}

impl Default for TestRunnerConfig {
    fn default() -> Self {
        Self {
            command: "node".to_string(),
        }
    }
}

/// Content-addressed upload gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Endpoint accepting `{ "code": ... }` uploads.
    pub upload_url: String,
    /// Prefix that turns a content hash into a public URL.
    pub content_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            upload_url: "https://lit-actions-deployer.herokuapp.com/".to_string(),
            content_url: "https://ipfs.litgateway.com/ipfs/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchConfig {
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            project_name: None,
            search_depth: default_search_depth(),
            default_command: default_command(),
            config_file: None,
            selected_template: default_template(),
            action_schema: None,
            build_config: BuildConfig::default(),
            bundler: BundlerConfig::default(),
            test_runner: TestRunnerConfig::default(),
            gateway: GatewayConfig::default(),
            watch: WatchConfig::default(),
            temp_server_port: default_server_port(),
            docs_url: default_docs_url(),
        }
    }
}

fn default_search_depth() -> u32 {
    4
}

fn default_command() -> String {
    "help".to_string()
}

fn default_template() -> String {
    "ts".to_string()
}

fn default_server_port() -> u16 {
    3031
}

fn default_docs_url() -> String {
    "https://getlit.dev".to_string()
}

/// Return the value of a required string key, rejecting absent or blank ones.
pub fn require<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(GetlitError::missing_config(field)),
    }
}

/// File-name suffixes an action goes through from source to test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLayout {
    pub in_file_ext: String,
    pub out_file_ext: String,
    pub test_file_ext: String,
}

impl ActionLayout {
    /// Source file name for an action.
    pub fn source_file(&self, name: &str) -> String {
        format!("{}{}", name, self.in_file_ext)
    }

    /// Artifact file name for an action.
    pub fn artifact_file(&self, name: &str) -> String {
        format!("{}{}", name, self.out_file_ext)
    }

    /// Test script file name for an action.
    pub fn test_file(&self, name: &str) -> String {
        format!("{}{}", name, self.test_file_ext)
    }

    /// Action name of a source file, if it carries the source suffix.
    pub fn action_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.in_file_ext.as_str())
            .filter(|name| !name.is_empty())
    }
}

impl ToolConfig {
    /// The workspace directory name.
    pub fn project_name(&self) -> Result<&str> {
        require(&self.project_name, "projectName")
    }

    /// The action file-name suffixes, all required.
    pub fn action_layout(&self) -> Result<ActionLayout> {
        let build = &self.build_config;
        Ok(ActionLayout {
            in_file_ext: require(&build.in_file_ext, "buildConfig.inFileExt")?.to_string(),
            out_file_ext: require(&build.out_file_ext, "buildConfig.outFileExt")?.to_string(),
            test_file_ext: require(&build.test_file_ext, "buildConfig.testFileExt")?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_keys() {
        let json = r#"{
            "projectName": "lit_actions",
            "searchDepth": 2,
            "buildConfig": { "srcDir": "src", "inFileExt": ".action.ts" }
        }"#;
        let config: ToolConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.project_name.as_deref(), Some("lit_actions"));
        assert_eq!(config.search_depth, 2);
        assert_eq!(config.build_config.src_dir.as_deref(), Some("src"));
        assert_eq!(config.build_config.out_dir, None);
    }

    #[test]
    fn defaults_fill_scalar_keys() {
        let config: ToolConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.search_depth, 4);
        assert_eq!(config.default_command, "help");
        assert_eq!(config.temp_server_port, 3031);
        assert_eq!(config.bundler.command, "esbuild");
        assert_eq!(config.test_runner.command, "node");
    }

    #[test]
    fn require_rejects_blank_values() {
        assert!(require(&Some("  ".into()), "x").is_err());
        assert!(require(&None, "x").is_err());
        assert_eq!(require(&Some("src".into()), "x").unwrap(), "src");
    }

    #[test]
    fn project_name_error_names_key() {
        let err = ToolConfig::default().project_name().unwrap_err();
        assert!(err.to_string().contains("projectName"));
    }

    #[test]
    fn action_layout_names_first_missing_key() {
        let mut config = ToolConfig::default();
        config.build_config.in_file_ext = Some(".action.ts".into());
        let err = config.action_layout().unwrap_err();
        assert!(err.to_string().contains("buildConfig.outFileExt"));
    }

    #[test]
    fn layout_derives_file_names() {
        let layout = ActionLayout {
            in_file_ext: ".action.ts".into(),
            out_file_ext: ".action.js".into(),
            test_file_ext: ".t.action.mjs".into(),
        };
        assert_eq!(layout.source_file("foo"), "foo.action.ts");
        assert_eq!(layout.artifact_file("foo"), "foo.action.js");
        assert_eq!(layout.test_file("foo"), "foo.t.action.mjs");
        assert_eq!(layout.action_name("foo.action.ts"), Some("foo"));
        assert_eq!(layout.action_name(".action.ts"), None);
        assert_eq!(layout.action_name("foo.ts"), None);
    }
}
