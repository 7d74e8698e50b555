// src/write.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    error::{Error, Result},
    table::Table,
    types::{Category, Item},
};

/// Flatten `item.data` and write it to `<output_dir>/<prefix>_<id>.csv`.
///
/// `output_dir` must already exist; this never creates directories.
/// Returns the path written.
pub fn write_item(item: &Item, category: Category, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(item.file_name(category));
    let table = Table::from_records(&item.data);
    write_table(&table, &path)?;
    debug!(path = %path.display(), rows = table.rows.len(), cols = table.columns.len(), "wrote item");
    Ok(path)
}

/// Write `table` as comma-separated values: a header row, then one row
/// per record, missing cells empty. A table with no records produces an
/// empty file; records without any fields become blank lines under a
/// blank header.
///
/// Goes through a hidden temp file next to `path` and renames it over
/// the target, so a failed write never leaves a truncated CSV behind.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let res = write_csv(table, &tmp_path);
    if res.is_err() {
        let _ = fs::remove_file(&tmp_path);
        return res;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::write(path, e)
    })
}

fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::write(path, e))?;
    let mut out = BufWriter::new(file);

    if table.columns.is_empty() {
        if !table.is_empty() {
            // header + one line per record
            let blank = "\n".repeat(table.rows.len() + 1);
            out.write_all(blank.as_bytes())
                .map_err(|e| Error::write(path, e))?;
        }
        return out.flush().map_err(|e| Error::write(path, e));
    }

    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(&table.columns).map_err(csv_err)?;
    for row in &table.rows {
        wtr.write_record(
            row.iter()
                .map(|cell| cell.as_ref().map(ToString::to_string).unwrap_or_default()),
        )
        .map_err(csv_err)?;
    }

    wtr.flush().map_err(|e| Error::write(path, e))?;
    Ok(())
}
