// config command: show effective settings or write a settings file

use std::path::PathBuf;

use serde::Serialize;
use sheetclean_config::Settings;

use crate::CliError;

#[derive(Serialize)]
struct ConfigView<'a> {
    path: String,
    exists: bool,
    settings: &'a Settings,
}

pub fn cmd_config(path: Option<PathBuf>, init: bool, force: bool) -> Result<(), CliError> {
    let path = path.unwrap_or_else(Settings::config_path);

    if init {
        // Start from defaults, not from whatever is on disk
        Settings::default().save_to(&path, force).map_err(|e| {
            if path.exists() && !force {
                CliError::args(e).with_hint("pass --force to overwrite")
            } else {
                CliError::output(e)
            }
        })?;
        eprintln!("Wrote default settings: {}", path.display());
        return Ok(());
    }

    let exists = path.is_file();
    let settings = if exists { Settings::load_from(&path) } else { Settings::default() };
    let view = ConfigView {
        path: path.display().to_string(),
        exists,
        settings: &settings,
    };
    let json = serde_json::to_string_pretty(&view)
        .map_err(|e| CliError::output(format!("cannot serialize settings: {}", e)))?;
    println!("{}", json);
    Ok(())
}
