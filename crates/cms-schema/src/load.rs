//! # Schema and Document Loading
//!
//! Schema files are YAML (JSON is accepted as a YAML subset). Documents are
//! JSON, or YAML when the file extension says so; YAML documents are
//! converted to `serde_json::Value` before validation.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::document::SchemaDocument;
use crate::error::SchemaError;

/// Parse schema text. `source_name` only labels errors.
pub fn parse_schema_document(text: &str, source_name: &str) -> Result<SchemaDocument, SchemaError> {
    let source = parse_schema_source(text, source_name)?;
    schema_document_from_source(&source, source_name)
}

/// Interpret an already parsed schema source as a [`SchemaDocument`].
pub fn schema_document_from_source(
    source: &Value,
    source_name: &str,
) -> Result<SchemaDocument, SchemaError> {
    SchemaDocument::deserialize(source).map_err(|e| SchemaError::Parse {
        source_name: source_name.to_string(),
        reason: format!("not a field list or section map: {e}"),
    })
}

/// Parse schema text into its raw JSON form, keeping keys the model ignores.
pub fn parse_schema_source(text: &str, source_name: &str) -> Result<Value, SchemaError> {
    let parse_err = |reason: String| SchemaError::Parse {
        source_name: source_name.to_string(),
        reason,
    };
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| parse_err(format!("invalid YAML: {e}")))?;
    let value = yaml_to_json_value(&yaml).map_err(parse_err)?;
    if value.is_null() {
        return Err(parse_err("empty schema".to_string()));
    }
    Ok(value)
}

/// Read and parse a schema file.
pub fn load_schema_file(path: &Path) -> Result<SchemaDocument, SchemaError> {
    let text = std::fs::read_to_string(path)?;
    parse_schema_document(&text, &source_name(path))
}

/// Parse a document, as YAML when `yaml` is set and as JSON otherwise.
pub fn parse_document(text: &str, yaml: bool) -> Result<Value, String> {
    if yaml {
        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| format!("invalid YAML: {e}"))?;
        yaml_to_json_value(&value).map_err(|e| format!("YAML-to-JSON conversion failed: {e}"))
    } else {
        serde_json::from_str(text).map_err(|e| format!("invalid JSON: {e}"))
    }
}

/// Read a document file, choosing the format from its extension.
pub fn load_document_file(path: &Path) -> Result<Value, SchemaError> {
    let text = std::fs::read_to_string(path).map_err(|e| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    parse_document(&text, yaml).map_err(|reason| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Convert a YAML value to JSON. Tags are dropped; scalar keys are
/// stringified.
pub(crate) fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                out.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(out))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_core::FieldKind;
    use serde_json::json;
    use std::io::Write;

    const BLOG_SCHEMA: &str = r#"
- id: title
  type: string
  label: Título
- id: price
  type: number
  label: Precio
- id: tags
  type: select
  label: Etiquetas
  options:
    multiple: true
    values:
      - noticias
      - { value: eventos, label: Eventos }
"#;

    #[test]
    fn parses_flat_yaml_schema() {
        let doc = parse_schema_document(BLOG_SCHEMA, "blog.news.yaml").unwrap();
        let SchemaDocument::Flat(fields) = doc else {
            panic!("expected flat schema");
        };
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[1].kind, FieldKind::Number);
        assert!(fields[2].options.multiple);
        assert_eq!(fields[2].options.allowed(), vec!["noticias", "eventos"]);
    }

    #[test]
    fn json_text_is_valid_schema() {
        let doc = parse_schema_document(r#"[{"id": "a", "type": "url"}]"#, "a.json").unwrap();
        assert!(matches!(doc, SchemaDocument::Flat(_)));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = parse_schema_document("- id: [unclosed", "bad.yaml").unwrap_err();
        assert!(matches!(err, SchemaError::Parse { ref source_name, .. } if source_name == "bad.yaml"));
    }

    #[test]
    fn empty_and_scalar_schemas_rejected() {
        assert!(parse_schema_document("", "e.yaml").is_err());
        assert!(parse_schema_document("42", "n.yaml").is_err());
    }

    #[test]
    fn malformed_descriptors_load_and_stay_permissive() {
        let text = "- { id: year, type: number, label: 2024 }\n- { id: x, type: 5 }\n- { id: o, type: object, fields: {} }\n";
        let doc = parse_schema_document(text, "page.home.yaml").unwrap();
        let SchemaDocument::Flat(ref fields) = doc else {
            panic!("expected flat schema");
        };
        assert_eq!(fields[0].label, "2024");
        assert_eq!(fields[1].kind, FieldKind::Other("5".into()));

        let schema = doc.compile();
        assert!(schema.validate(&json!({"year": 1, "o": {}})).is_accepted());
        assert!(schema.validate(&json!({"year": 1, "x": "", "o": {"extra": 1}})).is_accepted());
        let result = schema.validate(&json!({"year": "x", "o": {}}));
        assert_eq!(result.issues()[0].message, "2024 debe ser un número");
    }

    #[test]
    fn source_keeps_unknown_keys() {
        let raw = parse_schema_source("- {id: a, type: string, placeholder: Escribe}", "x").unwrap();
        assert_eq!(raw[0]["placeholder"], json!("Escribe"));
    }

    #[test]
    fn loads_schema_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(BLOG_SCHEMA.as_bytes()).unwrap();
        let doc = load_schema_file(file.path()).unwrap();
        assert_eq!(doc.field_count(), 3);
    }

    #[test]
    fn missing_schema_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_schema_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, SchemaError::Io(_)));
    }

    #[test]
    fn document_format_follows_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("doc.yml");
        std::fs::write(&yaml_path, "title: Hola\nprice: '3'\n").unwrap();
        assert_eq!(
            load_document_file(&yaml_path).unwrap(),
            json!({"title": "Hola", "price": "3"})
        );

        let json_path = dir.path().join("doc.json");
        std::fs::write(&json_path, r#"{"title": "Hola"}"#).unwrap();
        assert_eq!(load_document_file(&json_path).unwrap(), json!({"title": "Hola"}));
    }

    #[test]
    fn bad_document_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_document_file(&path).unwrap_err();
        assert!(matches!(err, SchemaError::DocumentLoad { .. }));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn yaml_numeric_keys_become_strings() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: a\ntrue: b\n").unwrap();
        assert_eq!(yaml_to_json_value(&yaml).unwrap(), json!({"1": "a", "true": "b"}));
    }
}
