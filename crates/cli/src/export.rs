//! `clvchat export`: cleaned table to CSV or JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clvchat_io::export::{write_csv, write_json};
use clvchat_io::DEFAULT_DELIMITER;

use crate::{CliError, Context, ExportFormat};

pub fn cmd_export(ctx: &Context, to: ExportFormat, output: Option<PathBuf>) -> Result<(), CliError> {
    let loaded = ctx.load_table()?;
    let delimiter = ctx.delimiter.unwrap_or(DEFAULT_DELIMITER);

    let writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| CliError::write(format!("{}: {e}", path.display())))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    match to {
        ExportFormat::Csv => write_csv(&loaded.table, writer, delimiter),
        ExportFormat::Json => write_json(&loaded.table, writer),
    }
    .map_err(CliError::write)?;

    if let Some(path) = output {
        eprintln!("wrote {} rows to {}", loaded.table.row_count(), path.display());
    }
    Ok(())
}
