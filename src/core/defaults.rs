//! Built-in defaults for every optional `SiteConfig` field.
//!
//! These are used as serde defaults, so a config file only needs the keys it
//! wants to change.

// =============================================================================
// Generator
// =============================================================================

pub const DEFAULT_SHEET_NAME: &str = "www";
pub const DEFAULT_API_KEY_ENV: &str = "SHEETS_API_KEY";
pub const DEFAULT_CTA_LABEL: &str = "Buy on Amazon";

/// Raw `rating_value` placeholder when the sheet has no `rating_value` text row.
pub const DEFAULT_RATING_VALUE: &str = "4.3";

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// =============================================================================
// Deploy
// =============================================================================

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Automated deploy - static site push";
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_REMOTE_HOST: &str = "github.com";
pub const DEFAULT_REMOTE_NAME: &str = "origin";
pub const NOREPLY_EMAIL_DOMAIN: &str = "users.noreply.github.com";

pub const NOJEKYLL_FILE: &str = ".nojekyll";
pub const CNAME_FILE: &str = "CNAME";
pub const ASSETS_DIR: &str = "assets";
pub const INDEX_FILE: &str = "index.html";

// =============================================================================
// Config files
// =============================================================================

pub const CONFIG_FILE_NAMES: &[&str] = &["sheetsite.json", "sheetsite.toml"];
pub const ENV_PREFIX: &str = "SHEETSITE_";

// =============================================================================
// Serde default functions
// =============================================================================

pub(crate) fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

pub(crate) fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

pub(crate) fn default_cta_label() -> String {
    DEFAULT_CTA_LABEL.to_string()
}

pub(crate) fn default_rating() -> String {
    DEFAULT_RATING_VALUE.to_string()
}

pub(crate) fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

pub(crate) fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_string()
}

pub(crate) fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

pub(crate) fn default_remote_host() -> String {
    DEFAULT_REMOTE_HOST.to_string()
}

/// No-reply address used as the committer email when none is configured.
pub fn noreply_email(user: &str) -> String {
    format!("{}@{}", user, NOREPLY_EMAIL_DOMAIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noreply_email_uses_github_domain() {
        assert_eq!(noreply_email("octo"), "octo@users.noreply.github.com");
    }
}
