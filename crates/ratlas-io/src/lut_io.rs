//! Lookup table (TSV) reading and writing.
//!
//! The on-disk format is a tab-separated file with a header row; the
//! `regions` and `index` columns are resolved by name, so extra columns
//! and arbitrary column order are tolerated on input. Output always
//! writes exactly `regions\tindex`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ratlas_core::LookupRow;

/// Read `(region, index)` rows from a tab-separated table.
pub fn read_lookup_table<P: AsRef<Path>>(path: P) -> Result<Vec<LookupRow>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read lookup table {}", path.display()))?;

    let mut lines = text.lines();
    let header = match lines.next() {
        Some(line) => line,
        None => bail!("lookup table {} is empty", path.display()),
    };
    let columns: Vec<&str> = header.split('\t').collect();
    let region_col = columns
        .iter()
        .position(|&c| c == "regions")
        .with_context(|| format!("lookup table {} has no \"regions\" column", path.display()))?;
    let index_col = columns
        .iter()
        .position(|&c| c == "index")
        .with_context(|| format!("lookup table {} has no \"index\" column", path.display()))?;

    let mut rows = Vec::new();
    for (number, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let region = fields.get(region_col).with_context(|| {
            format!("lookup table {} line {}: too few columns", path.display(), number + 2)
        })?;
        let index = fields
            .get(index_col)
            .with_context(|| {
                format!("lookup table {} line {}: too few columns", path.display(), number + 2)
            })?
            .trim()
            .parse::<i32>()
            .with_context(|| {
                format!("lookup table {} line {}: bad index", path.display(), number + 2)
            })?;
        rows.push(LookupRow::new(region.to_string(), index));
    }
    Ok(rows)
}

/// Write rows as a tab-separated table with a `regions\tindex` header.
pub fn write_lookup_table<P: AsRef<Path>>(path: P, rows: &[LookupRow]) -> Result<()> {
    let path = path.as_ref();
    let mut out = String::with_capacity(16 + rows.len() * 24);
    out.push_str("regions\tindex\n");
    for row in rows {
        out.push_str(&row.region);
        out.push('\t');
        out.push_str(&row.index.to_string());
        out.push('\n');
    }
    fs::write(path, out)
        .with_context(|| format!("failed to write lookup table {}", path.display()))
}
