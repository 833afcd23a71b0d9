//! Compiled schema documents.
//!
//! The schema compiler hands over a list of type definitions, each with its
//! fields and the directives attached to them:
//!
//! ```yaml
//! types:
//!   - name: User
//!     fields:
//!       - name: password
//!         directives: [redactSecrets]
//!       - name: email
//! ```
//!
//! Directives may be written as a bare name or as `{name, arguments}`.

use crate::error::{CodegenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Serialization of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// Detect the format from a path's extension.
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "json" => Some(SchemaFormat::Json),
            "yaml" | "yml" => Some(SchemaFormat::Yaml),
            _ => None,
        }
    }
}

/// The full set of compiled type definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

/// One object type and its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl FieldDefinition {
    /// Whether the field carries the named directive.
    pub fn has_directive(&self, name: &str) -> bool {
        self.directives.iter().any(|d| d.name() == name)
    }
}

/// A directive applied to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Directive {
    Bare(String),
    Full {
        name: String,
        #[serde(default)]
        arguments: BTreeMap<String, serde_json::Value>,
    },
}

impl Directive {
    pub fn name(&self) -> &str {
        match self {
            Directive::Bare(name) => name,
            Directive::Full { name, .. } => name,
        }
    }
}

impl SchemaDocument {
    /// Load a schema document, picking the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = SchemaFormat::detect(path).ok_or_else(|| {
            CodegenError::UnsupportedSchemaFormat {
                path: path.to_path_buf(),
            }
        })?;
        let content = fs::read_to_string(path).map_err(|source| CodegenError::SchemaRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content, format).map_err(|reason| CodegenError::SchemaParse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse a schema document from text.
    pub fn parse_str(content: &str, format: SchemaFormat) -> std::result::Result<Self, String> {
        match format {
            SchemaFormat::Json => serde_json::from_str(content)
                .map_err(|e| format!("invalid json schema document: {}", e)),
            SchemaFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| format!("invalid yaml schema document: {}", e)),
        }
    }

    /// Total number of field definitions across all types.
    pub fn field_count(&self) -> usize {
        self.types.iter().map(|t| t.fields.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const YAML: &str = r#"
types:
  - name: User
    fields:
      - name: password
        directives: [redactSecrets]
      - name: email
  - name: Deploy
    fields:
      - name: token
        directives:
          - name: redactSecrets
            arguments:
              reason: credential
      - name: region
        directives: [deprecated]
"#;

    #[test]
    fn test_detect_format() {
        assert_eq!(SchemaFormat::detect(Path::new("s.json")), Some(SchemaFormat::Json));
        assert_eq!(SchemaFormat::detect(Path::new("s.YAML")), Some(SchemaFormat::Yaml));
        assert_eq!(SchemaFormat::detect(Path::new("s.yml")), Some(SchemaFormat::Yaml));
        assert_eq!(SchemaFormat::detect(Path::new("schema.graphql")), None);
        assert_eq!(SchemaFormat::detect(Path::new("schema")), None);
    }

    #[test]
    fn test_parse_yaml_mixed_directives() {
        let doc = SchemaDocument::parse_str(YAML, SchemaFormat::Yaml).unwrap();
        assert_eq!(doc.types.len(), 2);
        assert_eq!(doc.field_count(), 4);

        let user = &doc.types[0];
        assert!(user.fields[0].has_directive("redactSecrets"));
        assert!(!user.fields[1].has_directive("redactSecrets"));

        let token = &doc.types[1].fields[0];
        assert!(token.has_directive("redactSecrets"));
        match &token.directives[0] {
            Directive::Full { arguments, .. } => {
                assert_eq!(arguments["reason"], serde_json::json!("credential"));
            }
            other => panic!("expected full directive, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"types":[{"name":"User","fields":[{"name":"apiKey","directives":[{"name":"redactSecrets"}]}]}]}"#;
        let doc = SchemaDocument::parse_str(json, SchemaFormat::Json).unwrap();
        assert!(doc.types[0].fields[0].has_directive("redactSecrets"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = SchemaDocument::parse_str("{\"types\": 3}", SchemaFormat::Json).unwrap_err();
        assert!(err.contains("invalid json schema document"));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let err = SchemaDocument::load(&PathBuf::from("schema.graphql")).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedSchemaFormat { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SchemaDocument::load(&PathBuf::from("/nonexistent/schema.json")).unwrap_err();
        assert!(matches!(err, CodegenError::SchemaRead { .. }));
    }

    #[test]
    fn test_directive_names_are_case_sensitive() {
        let field = FieldDefinition {
            name: "password".into(),
            directives: vec![Directive::Bare("RedactSecrets".into())],
        };
        assert!(!field.has_directive("redactSecrets"));
    }
}
