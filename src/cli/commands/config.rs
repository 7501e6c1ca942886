//! ffcs config - Show the effective configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, robot_ok};
use crate::error::{FfcsError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print a single section (catalog, embedding, recommend, cache, output)
    #[arg(long)]
    pub section: Option<String>,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    let value = serde_json::to_value(&ctx.config)?;
    let value = match &args.section {
        Some(section) => value.get(section).cloned().ok_or_else(|| {
            FfcsError::InvalidRequest(format!("unknown config section {section}"))
        })?,
        None => value,
    };

    if ctx.robot() {
        return emit_robot(&robot_ok(value));
    }

    let rendered = toml::to_string_pretty(&value)
        .map_err(|err| FfcsError::Config(format!("render config: {err}")))?;
    print!("{rendered}");
    Ok(())
}
