//! Check that local `src="..."` references in generated HTML exist on disk.
//!
//! The audit is advisory: it returns a report and never fails generation.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use crate::error::Result;
use crate::utils::io;

const EXTERNAL_PREFIXES: &[&str] = &["http", "//", "data:"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingAsset {
    pub reference: String,
    pub resolved: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Local references that were checked.
    pub checked: usize,
    pub missing: Vec<MissingAsset>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "Missing files: none");
        }
        write!(f, "Missing files:")?;
        for asset in &self.missing {
            write!(f, "\n- {} -> {}", asset.reference, asset.resolved)?;
        }
        Ok(())
    }
}

pub fn is_external(reference: &str) -> bool {
    EXTERNAL_PREFIXES.iter().any(|p| reference.starts_with(p))
}

/// All `src="..."` values in document order.
pub fn src_references(html: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"src="([^"]+)""#).expect("src pattern is valid"));
    re.captures_iter(html)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Resolve `.` and `..` without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path a reference points at under `root`.
///
/// A leading `/` is taken as site-root relative. Query strings and
/// fragments are not part of the file name.
pub fn resolve_reference(root: &Path, reference: &str) -> PathBuf {
    let file_part = reference
        .split(['?', '#'])
        .next()
        .unwrap_or(reference)
        .trim_start_matches('/');
    normalize_lexically(&root.join(file_part))
}

pub fn audit_html(html: &str, root: &Path) -> AuditReport {
    let mut report = AuditReport::default();
    for reference in src_references(html) {
        if is_external(&reference) {
            continue;
        }
        report.checked += 1;

        let resolved = resolve_reference(root, &reference);
        if !resolved.exists() {
            report.missing.push(MissingAsset {
                reference,
                resolved: resolved.display().to_string(),
            });
        }
    }
    report
}

/// Audit a generated file against `root`.
pub fn audit_file(html_path: &Path, root: &Path) -> Result<AuditReport> {
    let html = io::read_file(html_path, "read generated HTML")?;
    let report = audit_html(&html, root);
    log_status!(
        "audit",
        "{} local references checked, {} missing",
        report.checked,
        report.missing.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_references_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let html = r#"<img src="https://cdn/x.png"><img src="//cdn/y.png"><img src="data:image/png;base64,AA">"#;
        let report = audit_html(html, dir.path());
        assert_eq!(report.checked, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn reports_missing_local_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/ok.png"), "").unwrap();

        let html = r#"<img src="assets/ok.png"><img src="assets/gone.png"><script src="./js/app.js"></script>"#;
        let report = audit_html(html, dir.path());

        assert_eq!(report.checked, 3);
        let refs: Vec<&str> = report.missing.iter().map(|m| m.reference.as_str()).collect();
        assert_eq!(refs, vec!["assets/gone.png", "./js/app.js"]);
        assert!(report.missing[1].resolved.ends_with("js/app.js"));
        assert!(!report.missing[1].resolved.contains("/./"));
    }

    #[test]
    fn root_relative_and_query_suffix_resolve_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hero.jpg"), "").unwrap();

        let report = audit_html(r#"<img src="/hero.jpg?v=2">"#, dir.path());
        assert!(report.is_clean());
    }

    #[test]
    fn parent_segments_are_collapsed() {
        assert_eq!(
            normalize_lexically(Path::new("/site/assets/../img/./a.png")),
            PathBuf::from("/site/img/a.png")
        );
    }

    #[test]
    fn display_formats() {
        assert_eq!(AuditReport::default().to_string(), "Missing files: none");

        let report = AuditReport {
            checked: 1,
            missing: vec![MissingAsset {
                reference: "a.png".to_string(),
                resolved: "/site/a.png".to_string(),
            }],
        };
        assert_eq!(report.to_string(), "Missing files:\n- a.png -> /site/a.png");
    }
}
