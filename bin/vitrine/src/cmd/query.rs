//! Query command - run one GROQ query

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::Value;
use vitrine_content::build_source;
use vitrine_core::ContentQuery;

/// Run the query command and print the backend response.
pub async fn run(config_path: &Path, groq: &str, params: &[String], relay: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    let mode = super::source_mode(relay);
    tracing::info!(%mode, "Running query");

    let mut query = ContentQuery::new(groq);
    for param in params {
        let (name, value) = parse_param(param)?;
        query = query.with_param(name, value);
    }

    let source = build_source(&config, mode);
    let response = source
        .query(&query)
        .await
        .wrap_err_with(|| format!("Query failed via {mode} source"))?;

    super::print_json(&response)
}

/// Parse `name=value`. The value is read as JSON when it parses, else as a
/// plain string.
pub fn parse_param(raw: &str) -> Result<(&str, Value)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| eyre!("Invalid param '{raw}', expected name=value"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(eyre!("Invalid param '{raw}', name is empty"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_param() {
        let (name, value) = parse_param("slug=about").expect("param");
        assert_eq!(name, "slug");
        assert_eq!(value, json!("about"));

        assert_eq!(parse_param("limit=3").expect("param").1, json!(3));
        assert_eq!(parse_param("flag=true").expect("param").1, json!(true));
        assert_eq!(parse_param("text=\"a=b\"").expect("param").1, json!("a=b"));
        assert_eq!(parse_param("raw=a=b").expect("param").1, json!("a=b"));
    }

    #[test]
    fn test_parse_param_rejects_malformed() {
        assert!(parse_param("slug").is_err());
        assert!(parse_param("=about").is_err());
    }
}
