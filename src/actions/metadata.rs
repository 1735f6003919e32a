//! Action metadata headers.
//!
//! Every action source opens with a comment block of `KEY: value` lines.
//! The keys looked for are the `properties` of the action schema, matched
//! case-insensitively; the values are validated against that schema before
//! anything is bundled.

use std::path::Path;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{GetlitError, Result};

use super::templates;

/// Schema shipped with the binary.
pub const DEFAULT_SCHEMA_PATH: &str = "schemas/action.schema.json";

/// Key whose value becomes the bundle's global name.
pub const GLOBAL_NAME_KEY: &str = "VAR";

/// Key the deploy flow anchors its source line to.
pub const NAME_KEY: &str = "NAME";

/// Header values extracted from one action source, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMetadata {
    values: Vec<(String, String)>,
}

impl ActionMetadata {
    /// Value for `key`, as spelled in the schema.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The bundle's global name.
    pub fn global_name(&self) -> Option<&str> {
        self.get(GLOBAL_NAME_KEY)
    }

    /// Number of extracted keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys were found.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<Map<String, Value>>(),
        )
    }

    /// Comment block prepended to a built artifact.
    ///
    /// ```
    /// use getlit::actions::MetadataSchema;
    ///
    /// let schema = MetadataSchema::embedded().unwrap();
    /// let metadata = schema.extract("/**\n * VAR: Foo\n */");
    /// assert_eq!(metadata.banner(), "/**\n *\n * VAR: Foo\n *\n */\n");
    /// ```
    pub fn banner(&self) -> String {
        let lines = self
            .values
            .iter()
            .map(|(k, v)| format!(" * {}: {}\n *", k, v))
            .collect::<Vec<_>>()
            .join("\n");
        format!("/**\n *\n{}\n */\n", lines)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ActionMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::default();
        for (key, value) in iter {
            let key = key.into();
            if metadata.get(&key).is_none() {
                metadata.values.push((key, value.into()));
            }
        }
        metadata
    }
}

/// Compiled action schema plus one header pattern per property.
pub struct MetadataSchema {
    validator: jsonschema::Validator,
    patterns: Vec<(String, Regex)>,
}

impl std::fmt::Debug for MetadataSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataSchema")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl MetadataSchema {
    /// Compile a schema document.
    pub fn from_value(schema: &Value, origin: &Path) -> Result<Self> {
        let parse_error = |message: String| GetlitError::ConfigParseError {
            path: origin.to_path_buf(),
            message,
        };

        let validator = jsonschema::validator_for(schema).map_err(|e| parse_error(e.to_string()))?;

        let mut patterns = Vec::new();
        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for key in properties.keys() {
                let pattern = format!(r"(?i)\b{}:[ \t]*(\w[\w \t]*)", regex::escape(key));
                let regex = Regex::new(&pattern).map_err(|e| parse_error(e.to_string()))?;
                patterns.push((key.clone(), regex));
            }
        }

        Ok(Self {
            validator,
            patterns,
        })
    }

    /// The schema compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let content = templates::embedded_text(DEFAULT_SCHEMA_PATH)?;
        let origin = Path::new(DEFAULT_SCHEMA_PATH);
        let schema: Value =
            serde_json::from_str(content).map_err(|e| GetlitError::ConfigParseError {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_value(&schema, origin)
    }

    /// Read and compile a schema file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GetlitError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| GetlitError::filesystem(path, e))?;
        let schema: Value =
            serde_json::from_str(&content).map_err(|e| GetlitError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_value(&schema, path)
    }

    /// Header keys, in schema order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(key, _)| key.as_str())
    }

    /// Pull every known `KEY: value` pair out of a source file.
    ///
    /// The first occurrence of each key wins; values stop at the end of the
    /// line or at the first character that is not a word character or blank.
    pub fn extract(&self, content: &str) -> ActionMetadata {
        self.patterns
            .iter()
            .filter_map(|(key, regex)| {
                let value = regex.captures(content)?.get(1)?.as_str().trim();
                Some((key.clone(), value.to_string()))
            })
            .collect()
    }

    /// Check extracted metadata against the schema.
    pub fn validate(&self, file: &Path, metadata: &ActionMetadata) -> Result<()> {
        let instance = metadata.to_json();
        let errors: Vec<String> = self
            .validator
            .iter_errors(&instance)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(GetlitError::MetadataInvalid {
                file: file.to_path_buf(),
                errors,
            })
        }
    }
}

/// Add a `KEY: value` line to an artifact's banner.
///
/// The line goes directly above the `NAME` entry, or at the top of the
/// first comment block when there is none.
pub fn insert_header_line(artifact: &str, line: &str) -> String {
    let anchor = format!(" * {}:", NAME_KEY);
    let insertion = format!(" * {}\n", line);

    if let Some(index) = artifact.find(&anchor) {
        let (before, after) = artifact.split_at(index);
        return format!("{}{}{}", before, insertion, after);
    }

    if let Some(rest) = artifact.strip_prefix("/**\n") {
        return format!("/**\n{}{}", insertion, rest);
    }

    format!("/**\n{} */\n{}", insertion, artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> MetadataSchema {
        MetadataSchema::embedded().unwrap()
    }

    #[test]
    fn embedded_schema_knows_name_and_var() {
        let keys: Vec<_> = schema().keys().map(String::from).collect();
        assert_eq!(keys, ["NAME", "VAR"]);
    }

    #[test]
    fn extract_reads_header_values() {
        let source = "/**\n * NAME: hello world\n * VAR: HelloWorld\n */\nconsole.log(1);\n";
        let metadata = schema().extract(source);

        assert_eq!(metadata.get("NAME"), Some("hello world"));
        assert_eq!(metadata.global_name(), Some("HelloWorld"));
    }

    #[test]
    fn extract_is_case_insensitive_on_keys() {
        let metadata = schema().extract("// var:   Foo\n");
        assert_eq!(metadata.global_name(), Some("Foo"));
    }

    #[test]
    fn extract_stops_at_line_end() {
        let metadata = schema().extract("/**\n * VAR: Foo\n * NAME: bar\n */");
        assert_eq!(metadata.global_name(), Some("Foo"));
        assert_eq!(metadata.get("NAME"), Some("bar"));
    }

    #[test]
    fn extract_ignores_missing_keys() {
        let metadata = schema().extract("console.log('no header');");
        assert!(metadata.is_empty());
    }

    #[test]
    fn validate_accepts_identifier_var() {
        let metadata: ActionMetadata = [("VAR", "Foo")].into_iter().collect();
        schema().validate(Path::new("foo.action.ts"), &metadata).unwrap();
    }

    #[test]
    fn validate_requires_var() {
        let metadata: ActionMetadata = [("NAME", "foo")].into_iter().collect();
        let err = schema()
            .validate(Path::new("src/foo.action.ts"), &metadata)
            .unwrap_err();

        match err {
            GetlitError::MetadataInvalid { file, errors } => {
                assert_eq!(file, Path::new("src/foo.action.ts"));
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("VAR"));
            }
            other => panic!("Expected MetadataInvalid, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_var_that_is_not_an_identifier() {
        let metadata: ActionMetadata = [("VAR", "my action")].into_iter().collect();
        assert!(schema().validate(Path::new("a"), &metadata).is_err());
    }

    #[test]
    fn custom_schema_drives_extraction() {
        let schema = MetadataSchema::from_value(
            &json!({
                "type": "object",
                "properties": { "AUTHOR": { "type": "string" } },
                "required": ["AUTHOR"]
            }),
            Path::new("custom.json"),
        )
        .unwrap();

        let metadata = schema.extract(" * AUTHOR: ada\n * VAR: Foo");
        assert_eq!(metadata.get("AUTHOR"), Some("ada"));
        assert_eq!(metadata.get("VAR"), None);
    }

    #[test]
    fn banner_follows_schema_property_order() {
        let schema = MetadataSchema::from_value(
            &json!({
                "type": "object",
                "properties": {
                    "VAR": { "type": "string" },
                    "AUTHOR": { "type": "string" }
                }
            }),
            Path::new("custom.json"),
        )
        .unwrap();

        assert_eq!(schema.keys().collect::<Vec<_>>(), ["VAR", "AUTHOR"]);
        let metadata = schema.extract(" * AUTHOR: ada\n * VAR: Foo\n");
        assert_eq!(
            metadata.banner(),
            "/**\n *\n * VAR: Foo\n *\n * AUTHOR: ada\n *\n */\n"
        );
    }

    #[test]
    fn invalid_schema_is_a_parse_error() {
        let err = MetadataSchema::from_value(&json!({ "type": 12 }), Path::new("bad.json"))
            .unwrap_err();
        assert!(matches!(err, GetlitError::ConfigParseError { .. }));
    }

    #[test]
    fn banner_lists_every_key() {
        let metadata: ActionMetadata = [("NAME", "foo"), ("VAR", "Foo")].into_iter().collect();
        assert_eq!(
            metadata.banner(),
            "/**\n *\n * NAME: foo\n *\n * VAR: Foo\n *\n */\n"
        );
    }

    #[test]
    fn insert_header_line_goes_above_name() {
        let artifact = "/**\n *\n * NAME: foo\n *\n */\ncode();";
        let updated = insert_header_line(artifact, "TYPESCRIPT SOURCE: https://x/Qm1");
        assert_eq!(
            updated,
            "/**\n *\n * TYPESCRIPT SOURCE: https://x/Qm1\n * NAME: foo\n *\n */\ncode();"
        );
    }

    #[test]
    fn insert_header_line_without_name_uses_first_block() {
        let artifact = "/**\n *\n * VAR: Foo\n *\n */\ncode();";
        let updated = insert_header_line(artifact, "SOURCE: x");
        assert!(updated.starts_with("/**\n * SOURCE: x\n *\n * VAR: Foo"));
    }

    #[test]
    fn insert_header_line_without_banner_adds_one() {
        let updated = insert_header_line("code();", "SOURCE: x");
        assert_eq!(updated, "/**\n * SOURCE: x\n */\ncode();");
    }
}
