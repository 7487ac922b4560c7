use clap::Args;

use sheetsite::deploy::{self, DeployReport};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct DeployArgs {
    /// Branch to publish (overrides config)
    #[arg(long)]
    pub branch: Option<String>,

    /// Commit message (overrides config)
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

pub fn run(args: DeployArgs, global: &GlobalArgs) -> CmdResult<DeployReport> {
    let mut config = global.load_config()?;
    if let Some(branch) = args.branch {
        config.branch = branch;
    }
    if let Some(message) = args.message {
        config.commit_message = message;
    }

    let report = deploy::run(&config)?;
    Ok((report, 0))
}
