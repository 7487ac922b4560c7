//! Blocking client for the spreadsheet values endpoint.

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde_json::{json, Value};
use std::time::Duration;

use crate::defaults::SHEETS_API_BASE;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("sheetsite/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

/// How requests authenticate against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// OAuth access token sent as `Authorization: Bearer`.
    Bearer(String),
    /// API key sent as the `key` query parameter.
    ApiKey(String),
}

fn http_error(e: reqwest::Error) -> Error {
    let mut err = Error::source_request_failed(format!("HTTP request failed: {}", e), true);
    err.details = json!({ "error": e.to_string() });
    err
}

/// 429 and 5xx are worth retrying, other statuses are not.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

fn api_error(status: u16, body: &str) -> Error {
    let mut err = Error::source_request_failed(
        format!("Spreadsheet API error: HTTP {}", status),
        is_retryable_status(status),
    );
    err.details = json!({ "status": status, "body": body });
    err
}

pub struct SheetsClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl SheetsClient {
    pub fn new(auth: Auth) -> Result<Self> {
        Self::with_base_url(SHEETS_API_BASE, auth)
    }

    pub fn with_base_url(base_url: &str, auth: Auth) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| Error::internal_io(e.to_string(), Some("create HTTP client".to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// `{base}/{spreadsheet_id}/values/{range}`, path segments escaped.
    pub fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::config_invalid_value("api_base", Some(self.base_url.clone()), e.to_string())
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::config_invalid_value(
                    "api_base",
                    Some(self.base_url.clone()),
                    "URL cannot be a base",
                )
            })?
            .push(spreadsheet_id)
            .push("values")
            .push(range);

        if let Auth::ApiKey(key) = &self.auth {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    /// Fetch a range and return its `values` matrix.
    pub fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<Value>>> {
        let url = self.values_url(spreadsheet_id, range)?;
        let mut request = self.client.get(url);
        if let Auth::Bearer(token) = &self.auth {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(http_error)?;
        let body = parse_json_response(response)?;
        values_from_body(&body)
    }
}

fn parse_json_response(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().map_err(http_error)?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| Error::source_invalid_response(format!("Invalid JSON response: {}", e)))
}

/// Extract the `values` matrix. A missing key means an empty sheet.
pub fn values_from_body(body: &Value) -> Result<Vec<Vec<Value>>> {
    match body.get("values") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => rows
            .iter()
            .map(|row| match row {
                Value::Array(cells) => Ok(cells.clone()),
                other => Err(Error::source_invalid_response(format!(
                    "Expected a row array, got {}",
                    other
                ))),
            })
            .collect(),
        Some(other) => Err(Error::source_invalid_response(format!(
            "Expected 'values' to be an array, got {}",
            other
        ))),
    }
}
