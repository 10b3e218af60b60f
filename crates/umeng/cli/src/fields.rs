//! `key=value` arguments and audience files.

use std::path::Path;

use serde_json::Value;
use umeng_core::FieldSet;

/// Parse `key=value`; the value is JSON when it parses, a string otherwise.
pub fn parse_field(arg: &str) -> Result<(String, Value), String> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{arg}`"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{arg}`"));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

pub fn field_set(pairs: Vec<(String, Value)>) -> FieldSet {
    pairs.into_iter().collect()
}

/// Read one entry per line, skipping blank lines.
pub fn read_entries(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_values() {
        assert_eq!(parse_field("title=hello").unwrap(), ("title".into(), json!("hello")));
        assert_eq!(parse_field("badge=3").unwrap(), ("badge".into(), json!(3)));
        assert_eq!(
            parse_field(r#"alert={"title":"t"}"#).unwrap(),
            ("alert".into(), json!({"title": "t"}))
        );
        assert_eq!(parse_field("url=a=b").unwrap(), ("url".into(), json!("a=b")));
        assert_eq!(parse_field("ticker=").unwrap(), ("ticker".into(), json!("")));
    }

    #[test]
    fn test_parse_field_errors() {
        assert!(parse_field("title").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_field_set_keeps_order() {
        let fields = field_set(vec![
            ("title".into(), json!("a")),
            ("text".into(), json!("b")),
            ("title".into(), json!("c")),
        ]);
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["title", "text"]);
        assert_eq!(fields.get_str("title"), Some("c"));
    }

    #[test]
    fn test_read_entries() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "t1\n\n t2 \r\nt3\n").unwrap();

        let entries = read_entries(file.path()).unwrap();

        assert_eq!(entries, ["t1", "t2", "t3"]);
    }
}
