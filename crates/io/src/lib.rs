// File I/O: order sheet input (Excel, CSV/TSV) and cleaned xlsx output

pub mod csv;
pub mod xlsx;

use std::path::{Path, PathBuf};

use sheetclean_engine::{CleanError, Grid};

/// Input formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    /// Anything calamine can open (xlsx, xlsm, xls, xlsb, ods).
    Spreadsheet,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Self::Csv,
            "tsv" | "tab" => Self::Tsv,
            _ => Self::Spreadsheet,
        }
    }
}

/// Open an input file as a grid whose first row is the header.
pub fn open_source(path: &Path) -> Result<Grid, CleanError> {
    if !path.exists() {
        return Err(CleanError::InputNotFound(path.display().to_string()));
    }
    let format = SourceFormat::from_path(path);
    log::debug!("opening {} as {:?}", path.display(), format);
    match format {
        SourceFormat::Csv => csv::import(path),
        SourceFormat::Tsv => csv::import_tsv(path),
        SourceFormat::Spreadsheet => xlsx::import(path),
    }
}

/// `<dir>/<input stem><suffix>.xlsx`; `dir` defaults to the current directory.
pub fn default_output_path(input: &Path, suffix: &str, dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let file_name = format!("{stem}{suffix}.xlsx");
    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Refuse to overwrite the input with the output.
pub fn check_output_path(input: &Path, output: &Path) -> Result<(), CleanError> {
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(CleanError::Output(format!(
            "output path {} is the input file",
            output.display()
        )));
    }
    Ok(())
}
