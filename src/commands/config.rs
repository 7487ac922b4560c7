use clap::{Args, Subcommand};
use serde::Serialize;

use sheetsite::config::SiteConfig;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display the resolved configuration (file + SHEETSITE_* overrides)
    Show,
    /// Show which config file is used
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<SiteConfig>,
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let config = global.load_config()?;
    let path = config.source_path.as_ref().map(|p| p.display().to_string());

    let output = match args.command {
        ConfigCommand::Show => ConfigOutput {
            command: "config.show".to_string(),
            path,
            config: Some(config),
        },
        ConfigCommand::Path => ConfigOutput {
            command: "config.path".to_string(),
            path,
            config: None,
        },
    };
    Ok((output, 0))
}
