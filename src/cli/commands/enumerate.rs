//! Enumerate command - List the files of a register folder to upload

use colored::Colorize;

use crate::cli::exit_codes;
use crate::cli::output::JsonOutput;
use crate::cli::Cli;
use crate::config::Config;
use crate::enumerator::Enumerator;
use crate::error::{OutputError, UploaderError};

/// Execute the enumeration
///
/// Loads the configuration, applies command-line overrides, enumerates the
/// root folder and writes the JSON result to stdout or `--output`.
///
/// # Errors
///
/// Returns an error if the root folder is unusable, the configuration file
/// cannot be loaded, or the result cannot be written
pub fn execute(cli: &Cli) -> Result<i32, UploaderError> {
    let config = cli.apply_overrides(Config::load_or_default(cli.config.as_deref())?);
    let enumerator = Enumerator::new(config.to_options());

    let result = enumerator.enumerate(&cli.root)?;

    let output = if cli.compact {
        JsonOutput::compact()
    } else {
        JsonOutput::new()
    };
    let rendered = output.render(&result)?;

    if let Some(output_path) = &cli.output {
        std::fs::write(output_path, format!("{rendered}\n")).map_err(|e| {
            UploaderError::Output(OutputError::FileWrite {
                path: output_path.display().to_string(),
                source: e,
            })
        })?;
        eprintln!(
            "{} {} files written to {}",
            "✓".green(),
            result.files.len(),
            output_path.display()
        );
    } else {
        println!("{rendered}");
    }

    if !result.report.warnings.is_empty() {
        eprintln!(
            "{} {} entries skipped",
            "warning:".yellow().bold(),
            result.report.warnings.len()
        );
    }

    Ok(exit_codes::SUCCESS)
}
