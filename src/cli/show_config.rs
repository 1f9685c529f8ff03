//! Show-config command implementation.

use super::{CliError, GameArgs};

/// Print the effective configuration as JSON.
///
/// The output can be saved and passed back with `--config`.
///
/// # Errors
///
/// Returns an error if the config file is invalid.
pub(crate) fn execute(args: &GameArgs) -> Result<(), CliError> {
    let config = args.config()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
