use clap::Args;
use std::path::PathBuf;

use sheetsite::generate::{self, GenerateOptions, GenerateReport};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct GenerateArgs {
    /// Read records from a local JSON export instead of the spreadsheet
    #[arg(long, value_name = "FILE")]
    pub records: Option<PathBuf>,

    /// Skip the missing-asset check after writing
    #[arg(long)]
    pub no_audit: bool,
}

pub fn run(args: GenerateArgs, global: &GlobalArgs) -> CmdResult<GenerateReport> {
    let mut config = global.load_config()?;
    if let Some(path) = args.records {
        config.records_path = Some(path.display().to_string());
    }

    let options = GenerateOptions {
        audit: !args.no_audit,
    };
    let report = generate::run(&config, &options)?;
    Ok((report, 0))
}
