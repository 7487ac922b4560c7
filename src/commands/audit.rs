use clap::Args;
use std::path::PathBuf;

use sheetsite::audit;

use super::GlobalArgs;

#[derive(Args)]
pub struct AuditArgs {
    /// HTML file to check (defaults to the configured output path)
    #[arg(long, value_name = "HTML")]
    pub file: Option<PathBuf>,

    /// Directory references resolve against (defaults to the site root,
    /// or the file's own directory when --file is given)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

/// Plain-text report. Missing files never change the exit code.
pub fn run_raw(args: AuditArgs, global: &GlobalArgs) -> sheetsite::Result<(String, i32)> {
    let (file, root) = match (args.file, args.root) {
        (Some(file), Some(root)) => (file, root),
        (Some(file), None) => {
            let root = file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            (file, root)
        }
        (None, root) => {
            let config = global.load_config()?;
            let root = match root {
                Some(root) => root,
                None => config.site_root()?,
            };
            (config.output_path()?, root)
        }
    };

    let report = audit::audit_file(&file, &root)?;
    Ok((format!("{}\n", report), 0))
}
