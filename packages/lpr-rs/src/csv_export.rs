//! CSV export of a [`ResultStore`].
//!
//! One header line, then one row per record:
//!
//! ```text
//! frame_nmr,car_id,car_bbox,license_plate_bbox,license_plate_bbox_score,license_number,license_number_score
//! 3,7,[10 10 50 50],[20 20 30 25],0.8,AB12CDE,0.95
//! ```
//!
//! Boxes are written as `[x1 y1 x2 y2]` and need their own parsing on the
//! way back in; [`parse_bbox`] does that.
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::geometry::BoundingBox;
use crate::result_store::{FrameRecord, ResultStore};

pub const HEADER: [&str; 7] = [
    "frame_nmr",
    "car_id",
    "car_bbox",
    "license_plate_bbox",
    "license_plate_bbox_score",
    "license_number",
    "license_number_score",
];

/// Writes `store` to `writer`, returning the number of rows.
pub fn write_records<W: Write>(store: &ResultStore, writer: W) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    let mut rows = 0;
    for record in store.records() {
        wtr.write_record([
            record.frame.to_string(),
            record.car_id.to_string(),
            record.car_bbox.to_string(),
            record.plate_bbox.to_string(),
            record.plate_score.to_string(),
            record.text.clone(),
            record.text_score.to_string(),
        ])?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

/// Writes `store` to a file at `path`, replacing it.
pub fn write_csv(store: &ResultStore, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("failed to open {}", path.display()))?;
    write_records(store, BufWriter::new(file))
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Parses `[x1 y1 x2 y2]`.
pub fn parse_bbox(field: &str) -> Result<BoundingBox> {
    let inner = field
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| anyhow!("bounding box {field:?} is not bracketed"))?;
    let values = inner
        .split_whitespace()
        .map(|v| v.parse::<f32>().with_context(|| format!("bad coordinate {v:?} in {field:?}")))
        .collect::<Result<Vec<_>>>()?;
    match values.as_slice() {
        [x1, y1, x2, y2] => Ok(BoundingBox::new(*x1, *y1, *x2, *y2)),
        _ => Err(anyhow!("expected 4 coordinates in {field:?}, got {}", values.len())),
    }
}

/// Reads an export back into a store.
pub fn read_records<R: Read>(reader: R) -> Result<ResultStore> {
    let mut rdr = csv::ReaderBuilder::new()
        .quoting(false)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    anyhow::ensure!(
        headers.iter().eq(HEADER.iter().copied()),
        "unexpected header {:?}",
        headers
    );

    let mut store = ResultStore::new();
    for (line, row) in rdr.records().enumerate() {
        let row = row?;
        let field = |i: usize| {
            row.get(i)
                .ok_or_else(|| anyhow!("row {} has only {} fields", line + 2, row.len()))
        };
        store.insert(FrameRecord {
            frame: field(0)?.parse()?,
            car_id: field(1)?.parse()?,
            car_bbox: parse_bbox(field(2)?)?,
            plate_bbox: parse_bbox(field(3)?)?,
            plate_score: field(4)?.parse()?,
            text: field(5)?.to_string(),
            text_score: field(6)?.parse()?,
        });
    }
    Ok(store)
}

pub fn read_csv(path: impl AsRef<Path>) -> Result<ResultStore> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_records(file).with_context(|| format!("failed to parse {}", path.display()))
}
