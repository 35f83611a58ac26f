//! Plain-text light-curve tables.
//!
//! Format: a header line `time_s flux flux_norm` followed by one
//! whitespace-separated row per sample, every value with 8 decimals. The
//! reader also accepts comma-separated files.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array1;
use occult_shared::output_index::write_next_file;

use crate::error::{SimResult, SimulationError};
use crate::sims::light_curve::LightCurve;

/// Column names, in file order.
pub const COLUMNS: [&str; 3] = ["time_s", "flux", "flux_norm"];

/// File extension for data tables.
pub const DAT_EXTENSION: &str = "dat";

/// Write the header and one row per sample.
pub fn write_light_curve<W: Write>(writer: &mut W, curve: &LightCurve) -> std::io::Result<()> {
    writeln!(writer, "{}", COLUMNS.join(" "))?;
    for ((t, f), n) in curve
        .time_s
        .iter()
        .zip(curve.flux.iter())
        .zip(curve.flux_norm.iter())
    {
        writeln!(writer, "{t:.8} {f:.8} {n:.8}")?;
    }
    Ok(())
}

/// Write `curve` to the next free `<prefix>_<N>.dat` in `dir`.
pub fn save_light_curve(dir: &Path, prefix: &str, curve: &LightCurve) -> SimResult<PathBuf> {
    let path = write_next_file(dir, prefix, DAT_EXTENSION, |_, file| -> SimResult<()> {
        let mut writer = BufWriter::new(file);
        write_light_curve(&mut writer, curve)?;
        writer.flush()?;
        Ok(())
    })?;
    log::info!("Wrote {} samples to {}", curve.len(), path.display());
    Ok(path)
}

/// Parse a table written by [`write_light_curve`].
///
/// Blank lines are skipped. Columns are matched by header name, so any
/// column order works.
pub fn read_light_curve(path: &Path) -> SimResult<LightCurve> {
    let reader = BufReader::new(File::open(path)?);
    let mut columns: Option<[usize; 3]> = None;
    let mut time_s = Vec::new();
    let mut flux = Vec::new();
    let mut flux_norm = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let fields: Vec<&str> = split_fields(&line);
        if fields.is_empty() {
            continue;
        }

        let Some(order) = columns else {
            columns = Some(header_order(&fields, line_number)?);
            continue;
        };

        if fields.len() != order.len() {
            return Err(SimulationError::Parse {
                line: line_number,
                reason: format!("expected {} values, found {}", order.len(), fields.len()),
            });
        }
        let value = |column: usize| -> SimResult<f64> {
            fields[column].parse().map_err(|_| SimulationError::Parse {
                line: line_number,
                reason: format!("'{}' is not a number", fields[column]),
            })
        };
        time_s.push(value(order[0])?);
        flux.push(value(order[1])?);
        flux_norm.push(value(order[2])?);
    }

    if columns.is_none() {
        return Err(SimulationError::Parse {
            line: 0,
            reason: "file has no header".to_string(),
        });
    }

    Ok(LightCurve {
        time_s: Array1::from(time_s),
        flux: Array1::from(flux),
        flux_norm: Array1::from(flux_norm),
    })
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect()
}

/// Position of each of [`COLUMNS`] in the header.
fn header_order(fields: &[&str], line: usize) -> SimResult<[usize; 3]> {
    if fields.len() != COLUMNS.len() {
        return Err(SimulationError::Parse {
            line,
            reason: format!("header must name {}", COLUMNS.join(", ")),
        });
    }
    let mut order = [0; 3];
    for (slot, name) in order.iter_mut().zip(COLUMNS) {
        *slot = fields
            .iter()
            .position(|field| *field == name)
            .ok_or_else(|| SimulationError::Parse {
                line,
                reason: format!("missing column '{name}'"),
            })?;
    }
    Ok(order)
}
