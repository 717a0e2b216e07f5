// clean / inspect command implementations

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sheetclean_config::Settings;
use sheetclean_engine::header::{ColumnRole, HeaderMap};
use sheetclean_engine::{inspect, transform, TransformReport};
use sheetclean_io::{check_output_path, default_output_path, open_source, xlsx};

use crate::CliError;

/// JSON envelope for `clean --json`.
#[derive(Serialize)]
struct RunReport<'a> {
    input: String,
    output: String,
    engine_version: &'static str,
    run_at: String,
    #[serde(flatten)]
    report: &'a TransformReport,
}

pub fn cmd_clean(
    input: PathBuf,
    output: Option<PathBuf>,
    json: bool,
    config: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = match &config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::args(format!("config file not found: {}", path.display()))
                    .with_hint(format!("default location: {}", Settings::config_path_display())));
            }
            Settings::load_from(path)
        }
        None => Settings::load(),
    };
    log::debug!("settings: {:?}", settings);

    let grid = open_source(&input).map_err(CliError::clean)?;
    let options = settings.transform_options();
    let (workbook, report) = transform(&grid, &options).map_err(CliError::clean)?;

    let output = output.unwrap_or_else(|| {
        default_output_path(&input, &settings.output_suffix, settings.output_directory.as_deref())
    });
    check_output_path(&input, &output).map_err(CliError::clean)?;

    let exported = xlsx::export(&workbook, &output).map_err(CliError::clean)?;
    log::debug!("export: {}", exported.summary());

    if !quiet {
        eprintln!("Saved cleaned file: {}", display_name(&output));
        eprintln!("{}", report.summary_line());
    }

    if json {
        let envelope = RunReport {
            input: input.display().to_string(),
            output: output.display().to_string(),
            engine_version: env!("CARGO_PKG_VERSION"),
            run_at: chrono::Utc::now().to_rfc3339(),
            report: &report,
        };
        write_json(&envelope)?;
    }

    Ok(())
}

pub fn cmd_inspect(input: PathBuf, json: bool) -> Result<(), CliError> {
    let grid = open_source(&input).map_err(CliError::clean)?;
    let headers = inspect(&grid).map_err(CliError::clean)?;

    if json {
        return write_json(&headers);
    }

    let text = render_headers(&headers);
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .map_err(|e| CliError::output(format!("cannot write to stdout: {}", e)))
}

fn render_headers(headers: &HeaderMap) -> String {
    let mut out = String::new();
    out.push_str("Columns:\n");
    for column in &headers.columns {
        let marker = match column.role {
            ColumnRole::OrderId if column.col != headers.order_col => " (ignored, later id column wins)",
            ColumnRole::TotalQuantity => " (ignored)",
            _ => "",
        };
        out.push_str(&format!(
            "  {:>3}  {:<24} {}{}\n",
            column.col, column.raw, column.role, marker
        ));
    }

    out.push_str("Groups:\n");
    for group in &headers.groups {
        let col = |c: Option<usize>| c.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:>3}  name={:<4} quantity={}\n",
            group.index,
            col(group.name_col),
            col(group.quantity_col)
        ));
    }
    out
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::output(format!("cannot serialize report: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetclean_engine::header::resolve_headers;
    use sheetclean_engine::CellValue;

    #[test]
    fn rendered_headers_list_roles_and_groups() {
        let header: Vec<CellValue> = ["id", "productName", "qty", "totalQty", "productName2"]
            .into_iter()
            .map(CellValue::from)
            .collect();
        let map = resolve_headers(&header).unwrap();
        let text = render_headers(&map);
        assert!(text.contains("totalQty"));
        assert!(text.contains("(ignored)"));
        assert!(text.contains("name=1"));
        assert!(text.contains("quantity=-"));
    }
}
