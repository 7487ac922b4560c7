use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Raw,
}

mod commands;
mod output;
mod tty;

use commands::{audit, config, deploy, generate};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "sheetsite")]
#[command(version = VERSION)]
#[command(about = "Generate a static site from a spreadsheet and publish it with git")]
struct Cli {
    /// Config file (default: ./sheetsite.json, ./sheetsite.toml, then ~/.config/sheetsite/sheetsite.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the page from spreadsheet records
    Generate(generate::GenerateArgs),
    /// Commit and push the site directory
    Deploy(deploy::DeployArgs),
    /// Report local asset references that do not exist
    Audit(audit::AuditArgs),
    /// Inspect the resolved configuration
    Config(config::ConfigArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Audit(_) => ResponseMode::Raw,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs { config: cli.config };

    if let ResponseMode::Raw = response_mode(&cli.command) {
        return match commands::run_raw(cli.command, &global) {
            Ok((content, exit_code)) => {
                print!("{}", content);
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
            Err(err) => {
                let exit_code = output::exit_code_for_error(err.code);
                output::print_result::<serde_json::Value>(Err(err)).ok();
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
        };
    }

    tty::status("sheetsite is working...");
    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    output::print_json_result(json_result).ok();

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
