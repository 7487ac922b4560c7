use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigMissingKey,
    ConfigInvalidValue,
    ConfigInvalidFile,

    ValidationInvalidArgument,

    EnvToolMissing,
    EnvCredentialMissing,

    TemplateNotFound,
    SitePrerequisiteMissing,

    DataNoRecords,
    SourceRequestFailed,
    SourceInvalidResponse,

    CommandFailed,
    GitCommandFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigMissingKey => "config.missing_key",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",
            ErrorCode::ConfigInvalidFile => "config.invalid_file",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::EnvToolMissing => "env.tool_missing",
            ErrorCode::EnvCredentialMissing => "env.credential_missing",

            ErrorCode::TemplateNotFound => "template.not_found",
            ErrorCode::SitePrerequisiteMissing => "site.prerequisite_missing",

            ErrorCode::DataNoRecords => "data.no_records",
            ErrorCode::SourceRequestFailed => "source.request_failed",
            ErrorCode::SourceInvalidResponse => "source.invalid_response",

            ErrorCode::CommandFailed => "command.failed",
            ErrorCode::GitCommandFailed => "git.command_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMissingKeyDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub stderr: String,
    pub attempts: u32,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn config_missing_key(key: impl Into<String>, path: Option<String>) -> Self {
        let key = key.into();
        let details = to_details(ConfigMissingKeyDetails {
            key: key.clone(),
            path,
        });

        Self::new(
            ErrorCode::ConfigMissingKey,
            format!("Missing required configuration key '{}'", key),
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.clone(),
        });

        Self::new(ErrorCode::ConfigInvalidValue, problem, details)
    }

    pub fn config_invalid_file(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::ConfigInvalidFile,
            format!("Cannot parse config file {}", path),
            serde_json::json!({ "path": path, "error": error.into() }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn tool_missing(tool: impl Into<String>) -> Self {
        let tool = tool.into();
        Self::new(
            ErrorCode::EnvToolMissing,
            format!("'{}' was not found in PATH", tool),
            serde_json::json!({ "tool": tool }),
        )
        .with_hint(format!("Install {} and make sure it is on PATH", tool))
    }

    pub fn credential_missing(variable: impl Into<String>) -> Self {
        let variable = variable.into();
        Self::new(
            ErrorCode::EnvCredentialMissing,
            format!("Environment variable {} is not set", variable),
            serde_json::json!({ "variable": variable }),
        )
        .with_hint("Export a personal access token with repository write permission")
    }

    pub fn template_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::TemplateNotFound,
            format!("Template file not found: {}", path),
            to_details(PathDetails { path }),
        )
    }

    pub fn prerequisite_missing(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::SitePrerequisiteMissing,
            message,
            to_details(PathDetails { path: path.into() }),
        )
        .with_hint("Run 'sheetsite generate' before deploying")
    }

    pub fn no_records(source: impl Into<String>) -> Self {
        let source = source.into();
        Self::new(
            ErrorCode::DataNoRecords,
            format!("No records found in {}", source),
            serde_json::json!({ "source": source }),
        )
        .with_hint("Fill in the type/key/field/value table and run again")
    }

    pub fn source_request_failed(message: impl Into<String>, retryable: bool) -> Self {
        let mut err = Self::new(
            ErrorCode::SourceRequestFailed,
            message,
            Value::Object(serde_json::Map::new()),
        );
        err.retryable = Some(retryable);
        err
    }

    pub fn source_invalid_response(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::SourceInvalidResponse,
            message,
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn command_failed(details: CommandFailedDetails, retryable: bool) -> Self {
        let message = match details.exit_code {
            Some(code) => format!("Command '{}' exited with status {}", details.command, code),
            None => format!("Command '{}' could not be started", details.command),
        };
        let mut err = Self::new(ErrorCode::CommandFailed, message, to_details(details));
        err.retryable = Some(retryable);
        err
    }

    pub fn git_command_failed(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::GitCommandFailed,
            message,
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            serde_json::json!({ "error": error.into(), "context": context }),
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// Text used by failure classifiers: message plus any captured stderr/error detail.
    pub fn failure_text(&self) -> String {
        let mut text = self.message.clone();
        for key in ["stderr", "error"] {
            if let Some(extra) = self.details.get(key).and_then(Value::as_str) {
                if !extra.is_empty() {
                    text.push('\n');
                    text.push_str(extra);
                }
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_namespaced() {
        assert_eq!(ErrorCode::DataNoRecords.as_str(), "data.no_records");
        assert_eq!(ErrorCode::EnvToolMissing.as_str(), "env.tool_missing");
    }

    #[test]
    fn failure_text_includes_stderr() {
        let err = Error::command_failed(
            CommandFailedDetails {
                command: "git push".to_string(),
                exit_code: Some(128),
                stderr: "fatal: unable to access 'https://github.com/'".to_string(),
                attempts: 1,
            },
            true,
        );

        let text = err.failure_text();
        assert!(text.contains("exited with status 128"));
        assert!(text.contains("unable to access"));
        assert_eq!(err.retryable, Some(true));
    }

    #[test]
    fn with_hint_appends() {
        let err = Error::no_records("sheet 'www'");
        assert_eq!(err.hints.len(), 1);
        assert!(err.message.contains("sheet 'www'"));
    }
}
