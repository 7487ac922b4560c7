//! Record sources.
//!
//! A source yields header-keyed rows; `fetch_records` turns them into
//! records under the API retry policy and rejects an empty result.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::http::{Auth, SheetsClient};
use crate::record::{self, Record};
use crate::retry::{self, RetryPolicy};
use crate::utils::io;

pub trait RecordSource {
    /// Short description for logs and errors.
    fn describe(&self) -> String;

    fn fetch_rows(&self) -> Result<Vec<Map<String, Value>>>;
}

/// Map a values matrix to rows keyed by the first row's headers.
///
/// Short rows are padded with empty strings; cells beyond the header width
/// and columns with a blank header are ignored.
pub fn rows_from_values(values: &[Vec<Value>]) -> Vec<Map<String, Value>> {
    let Some((header, body)) = values.split_first() else {
        return Vec::new();
    };
    let headers: Vec<String> = header
        .iter()
        .map(|h| crate::utils::normalize::clean_value(Some(h)))
        .collect();

    body.iter()
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, name)| !name.is_empty())
                .map(|(i, name)| {
                    let cell = cells.get(i).cloned().unwrap_or_else(|| Value::String(String::new()));
                    (name.clone(), cell)
                })
                .collect()
        })
        .collect()
}

/// Rows from the spreadsheet API.
pub struct SheetsSource {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    client: SheetsClient,
}

impl SheetsSource {
    pub fn new(spreadsheet_id: &str, sheet_name: &str, auth: Auth) -> Result<Self> {
        Ok(Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_name: sheet_name.to_string(),
            client: SheetsClient::new(auth)?,
        })
    }
}

impl RecordSource for SheetsSource {
    fn describe(&self) -> String {
        format!("sheet '{}' of spreadsheet {}", self.sheet_name, self.spreadsheet_id)
    }

    fn fetch_rows(&self) -> Result<Vec<Map<String, Value>>> {
        let values = self.client.get_values(&self.spreadsheet_id, &self.sheet_name)?;
        Ok(rows_from_values(&values))
    }
}

/// Rows from a local JSON export: either an array of row objects or a
/// `{"values": [[...]]}` body as returned by the API.
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RecordSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_rows(&self) -> Result<Vec<Map<String, Value>>> {
        let content = io::read_file(&self.path, "read records file")?;
        let parsed: Value = serde_json::from_str(&content).map_err(|e| {
            Error::source_invalid_response(format!("{}: {}", self.path.display(), e))
        })?;

        match parsed {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect()),
            body @ Value::Object(_) => {
                Ok(rows_from_values(&crate::http::values_from_body(&body)?))
            }
            _ => Err(Error::source_invalid_response(format!(
                "{}: expected an array of rows or a values object",
                self.path.display()
            ))),
        }
    }
}

/// Credentials file (bearer token) first, then the API key variable.
pub fn resolve_auth<F>(config: &SiteConfig, env: F) -> Result<Auth>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = config.credentials_path() {
        let token = io::read_file(&path, "read credentials")?;
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::config_invalid_value(
                "credentials",
                Some(path.display().to_string()),
                "Credentials file is empty",
            ));
        }
        return Ok(Auth::Bearer(token.to_string()));
    }

    env(&config.api_key_env)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .map(Auth::ApiKey)
        .ok_or_else(|| {
            Error::credential_missing(config.api_key_env.clone())
                .with_hint("Or set 'credentials' to a file holding an OAuth access token")
        })
}

/// Pick the source for this config: a local records file wins over the API.
pub fn from_config(config: &SiteConfig) -> Result<Box<dyn RecordSource>> {
    if let Some(path) = config.records_path() {
        return Ok(Box::new(JsonFileSource::new(&path)));
    }

    let spreadsheet_id = config
        .spreadsheet_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::config_missing_key("spreadsheet_id", None))?;
    let auth = resolve_auth(config, |name| std::env::var(name).ok())?;
    Ok(Box::new(SheetsSource::new(
        spreadsheet_id,
        config.sheet_name.trim(),
        auth,
    )?))
}

/// Fetch rows with retry, convert them to records, fail when none remain.
pub fn fetch_records(source: &dyn RecordSource, policy: &RetryPolicy) -> Result<Vec<Record>> {
    let label = source.describe();
    log_status!("source", "Fetching records from {}", label);

    let rows = retry::retry(policy, &label, retry::is_retryable, |_| source.fetch_rows())?;
    let records = record::from_rows(&rows);
    log_status!("source", "{} rows, {} usable records", rows.len(), records.len());

    if records.is_empty() {
        return Err(Error::no_records(label));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    struct FlakySource {
        failures: Cell<u32>,
        rows: Vec<Map<String, Value>>,
    }

    impl RecordSource for FlakySource {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        fn fetch_rows(&self) -> Result<Vec<Map<String, Value>>> {
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(Error::source_request_failed("HTTP 503", true));
            }
            Ok(self.rows.clone())
        }
    }

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            max_retries: 4,
            ..RetryPolicy::none()
        }
    }

    fn cells(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| json!(s)).collect()
    }

    #[test]
    fn header_row_keys_the_rows() {
        let rows = rows_from_values(&[
            cells(&["type", "key", "field", "value"]),
            cells(&["text", "hero_headline", "", "Hello"]),
            cells(&["product", "01"]),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["value"], "Hello");
        assert_eq!(rows[1]["field"], "");
        assert_eq!(rows[1]["value"], "");
    }

    #[test]
    fn empty_matrix_has_no_rows() {
        assert!(rows_from_values(&[]).is_empty());
        assert!(rows_from_values(&[cells(&["type", "key"])]).is_empty());
    }

    #[test]
    fn retries_retryable_errors() {
        let source = FlakySource {
            failures: Cell::new(2),
            rows: vec![json!({"type": "text", "key": "a", "value": "x"})
                .as_object()
                .cloned()
                .unwrap()],
        };

        let records = fetch_records(&source, &no_wait()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(source.failures.get(), 0);
    }

    #[test]
    fn no_usable_records_is_fatal() {
        let source = FlakySource {
            failures: Cell::new(0),
            rows: vec![json!({"type": "", "key": "a"}).as_object().cloned().unwrap()],
        };

        let err = fetch_records(&source, &no_wait()).unwrap_err();
        assert_eq!(err.code.as_str(), "data.no_records");
    }

    #[test]
    fn json_file_accepts_row_array_and_values_body() {
        let dir = tempfile::tempdir().unwrap();

        let rows_path = dir.path().join("rows.json");
        std::fs::write(
            &rows_path,
            r#"[{"type": "text", "key": "hero_lead", "field": "", "value": "Hi"}]"#,
        )
        .unwrap();
        assert_eq!(JsonFileSource::new(&rows_path).fetch_rows().unwrap().len(), 1);

        let values_path = dir.path().join("values.json");
        std::fs::write(
            &values_path,
            r#"{"values": [["type", "key", "value"], ["text", "hero_lead", "Hi"]]}"#,
        )
        .unwrap();
        let rows = JsonFileSource::new(&values_path).fetch_rows().unwrap();
        assert_eq!(rows[0]["key"], "hero_lead");
    }

    #[test]
    fn api_key_from_env_when_no_credentials_file() {
        let config = SiteConfig::default();
        let auth = resolve_auth(&config, |name| {
            (name == "SHEETS_API_KEY").then(|| "k".to_string())
        })
        .unwrap();
        assert_eq!(auth, Auth::ApiKey("k".to_string()));

        let err = resolve_auth(&config, |_| None).unwrap_err();
        assert_eq!(err.code.as_str(), "env.credential_missing");
    }

    #[test]
    fn credentials_file_gives_bearer_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "ya29.token\n").unwrap();

        let config = SiteConfig {
            credentials: Some(path.display().to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_auth(&config, |_| None).unwrap(),
            Auth::Bearer("ya29.token".to_string())
        );
    }
}
