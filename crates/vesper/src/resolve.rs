use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use log::debug;

use vesper_diagnostics::Diagnostic;
use vesper_linter::{Options, Settings};

use crate::warn_user_once;

/// Extension of Vesper source files.
const SOURCE_EXTENSION: &str = "vs";

/// Name of the configuration file searched for in the working directory.
const CONFIG_FILE: &str = "vesper.toml";

/// Load settings from `--config`, or from `vesper.toml` in the working
/// directory, or fall back to the defaults. Configuration problems are
/// returned as diagnostics; only an unreadable `--config` path is fatal.
pub(crate) fn resolve_settings(
    config: Option<&Path>,
) -> Result<(Settings, Option<PathBuf>, Vec<Diagnostic>)> {
    let path = match config {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = Path::new(CONFIG_FILE);
            default.is_file().then(|| default.to_path_buf())
        }
    };
    let Some(path) = path else {
        return Ok((Settings::default(), None, Vec::new()));
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read configuration file `{}`", path.display()))?;
    let (options, diagnostics) = Options::from_toml(&text);
    debug!("loaded configuration from {}", path.display());
    Ok((Settings::from_options(&options), Some(path), diagnostics))
}

/// Expand files and directories into the list of source files to process.
/// Explicitly named files are always included; directories are walked for
/// `.vs` files, honoring ignore files along the way.
pub(crate) fn resolve_files(files: &[PathBuf]) -> Vec<PathBuf> {
    let defaults = [PathBuf::from(".")];
    let roots: &[PathBuf] = if files.is_empty() { &defaults } else { files };

    let mut resolved = Vec::new();
    for root in roots {
        if root.is_file() {
            resolved.push(root.clone());
            continue;
        }
        for entry in WalkBuilder::new(root).build() {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_some_and(|kind| kind.is_file())
                        && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
                    {
                        resolved.push(path.to_path_buf());
                    }
                }
                Err(error) => {
                    debug!("skipping unreadable entry: {error}");
                    warn_user_once!("some paths could not be read and were skipped");
                }
            }
        }
    }
    resolved.sort_unstable();
    resolved.dedup();
    resolved
}
