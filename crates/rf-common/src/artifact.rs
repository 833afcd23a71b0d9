//! Persisted registry artifact format.
//!
//! The artifact is a mapping from field name to `true`, one entry per line,
//! sorted and deduplicated, under a header that marks the file as generated.
//! Rendering is a pure function of the field set, so regenerating from an
//! unchanged schema yields byte-identical output.

use crate::error::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// First-line marker written into every generated artifact.
pub const GENERATED_HEADER: &str = "Code generated by rf-codegen. DO NOT EDIT.";

/// Table holding the field entries in the TOML rendering.
pub const TABLE_NAME: &str = "redacted_fields";

/// Static item name in the Rust rendering.
pub const RUST_STATIC_NAME: &str = "REDACTED_FIELDS";

/// Rendering of the persisted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// TOML table, loadable at runtime.
    #[default]
    Toml,
    /// Rust source with a static slice, for `include!` at build time.
    Rust,
}

impl ArtifactFormat {
    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(ArtifactFormat::Toml),
            Some("rs") => Some(ArtifactFormat::Rust),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactFormat::Toml => write!(f, "toml"),
            ArtifactFormat::Rust => write!(f, "rust"),
        }
    }
}

/// Render a field set as an artifact.
///
/// Input order and duplicates do not matter; output is sorted by byte order.
pub fn render<I, S>(fields: I, format: ArtifactFormat) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: BTreeSet<String> = fields.into_iter().map(Into::into).collect();
    match format {
        ArtifactFormat::Toml => render_toml(&fields),
        ArtifactFormat::Rust => render_rust(&fields),
    }
}

fn render_toml(fields: &BTreeSet<String>) -> String {
    let mut out = format!("# {}\n\n[{}]\n", GENERATED_HEADER, TABLE_NAME);
    for field in fields {
        out.push_str(&toml_quote(field));
        out.push_str(" = true\n");
    }
    out
}

fn render_rust(fields: &BTreeSet<String>) -> String {
    let mut out = format!(
        "// {}\n\npub static {}: &[(&str, bool)] = &[\n",
        GENERATED_HEADER, RUST_STATIC_NAME
    );
    for field in fields {
        // Debug formatting of str yields a valid Rust string literal.
        out.push_str(&format!("    ({:?}, true),\n", field));
    }
    out.push_str("];\n");
    out
}

/// Quote a key as a TOML basic string.
fn toml_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Debug, Deserialize)]
struct ArtifactDocument {
    redacted_fields: Option<BTreeMap<String, bool>>,
}

/// Parse a TOML artifact into its field set.
///
/// Entries set to `false` are not part of the set.
pub fn parse_toml(content: &str) -> Result<BTreeSet<String>> {
    let doc: ArtifactDocument = toml::from_str(content)?;
    let table = doc
        .redacted_fields
        .ok_or_else(|| Error::InvalidArtifact(format!("missing [{}] table", TABLE_NAME)))?;
    Ok(table
        .into_iter()
        .filter_map(|(name, enabled)| enabled.then_some(name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_toml_sorted_and_deduped() {
        let out = render(["token", "password", "apiKey", "token"], ArtifactFormat::Toml);
        let expected = "# Code generated by rf-codegen. DO NOT EDIT.\n\n\
                        [redacted_fields]\n\
                        \"apiKey\" = true\n\
                        \"password\" = true\n\
                        \"token\" = true\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_rust() {
        let out = render(["secret", "password"], ArtifactFormat::Rust);
        assert!(out.starts_with("// Code generated by rf-codegen. DO NOT EDIT.\n"));
        assert!(out.contains("pub static REDACTED_FIELDS: &[(&str, bool)] = &[\n"));
        let password = out.find("(\"password\", true),").unwrap();
        let secret = out.find("(\"secret\", true),").unwrap();
        assert!(password < secret);
        assert!(out.ends_with("];\n"));
    }

    #[test]
    fn test_render_empty() {
        let out = render(Vec::<String>::new(), ArtifactFormat::Toml);
        assert!(parse_toml(&out).unwrap().is_empty());
    }

    #[test]
    fn test_parse_toml_reads_rendered_output() {
        let out = render(["b", "a", "weird \"key\"\\"], ArtifactFormat::Toml);
        let parsed = parse_toml(&out).unwrap();
        let names: Vec<&str> = parsed.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b", "weird \"key\"\\"]);
    }

    #[test]
    fn test_parse_toml_skips_false_entries() {
        let parsed = parse_toml("[redacted_fields]\npassword = true\nname = false\n").unwrap();
        assert!(parsed.contains("password"));
        assert!(!parsed.contains("name"));
    }

    #[test]
    fn test_parse_toml_missing_table() {
        let err = parse_toml("[other]\nx = true\n").unwrap_err();
        assert!(matches!(err, Error::InvalidArtifact(_)));
    }

    #[test]
    fn test_parse_toml_rejects_non_bool_values() {
        assert!(parse_toml("[redacted_fields]\npassword = \"yes\"\n").is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ArtifactFormat::from_path(Path::new("gen/fields.toml")),
            Some(ArtifactFormat::Toml)
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("src/redacted_fields_gen.rs")),
            Some(ArtifactFormat::Rust)
        );
        assert_eq!(ArtifactFormat::from_path(Path::new("fields.json")), None);
    }
}
