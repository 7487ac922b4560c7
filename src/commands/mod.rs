use std::path::PathBuf;

use sheetsite::config::SiteConfig;

pub type CmdResult<T> = sheetsite::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Explicit config file (`--config`).
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    pub(crate) fn load_config(&self) -> sheetsite::Result<SiteConfig> {
        sheetsite::config::load(self.config.as_deref())
    }
}

pub mod audit;
pub mod config;
pub mod deploy;
pub mod generate;

pub(crate) fn run_raw(
    command: crate::Commands,
    global: &GlobalArgs,
) -> sheetsite::Result<(String, i32)> {
    match command {
        crate::Commands::Audit(args) => audit::run_raw(args, global),
        _ => Err(sheetsite::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support raw output",
        )),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (sheetsite::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Generate(args) => dispatch!(args, global, generate),
        crate::Commands::Deploy(args) => dispatch!(args, global, deploy),
        crate::Commands::Config(args) => dispatch!(args, global, config),

        // Audit prints its plain-text report instead
        crate::Commands::Audit(_) => {
            let err = sheetsite::Error::validation_invalid_argument(
                "output_mode",
                "Audit command uses raw output mode",
            );
            crate::output::map_cmd_result_to_json::<serde_json::Value>(Err(err))
        }
    }
}
