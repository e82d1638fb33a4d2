use std::collections::HashMap;

use sv_core::CoordinateTransform;
use sv_tree::SkeletonGraph;

use crate::SwcError;
use crate::units::{SwcUnits, from_swc_coords};

/// First seven columns of one SWC row, coordinates as written.
#[derive(Debug, Clone, PartialEq)]
pub struct SwcRecord {
    pub sample_id: i64,
    pub type_id: i32,
    pub coords: [f64; 3],
    pub radius: f64,
    pub parent_id: i64,
}

/// Parses plain or extended SWC text.
///
/// Blank lines and `#` comments are skipped. A non-numeric first data row is
/// taken as the extended header. Columns past the seventh are ignored.
pub fn read_swc(text: &str) -> Result<Vec<SwcRecord>, SwcError> {
    let mut records = Vec::new();
    let mut seen_data = false;

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let row = raw.trim();
        if row.is_empty() || row.starts_with('#') {
            continue;
        }

        let cols: Vec<&str> = row.split_whitespace().collect();
        if !seen_data {
            seen_data = true;
            if cols[0].parse::<f64>().is_err() {
                log::debug!("line {line}: treating as header");
                continue;
            }
        }

        if cols.len() < 7 {
            return Err(SwcError::Parse {
                line,
                message: format!("expected at least 7 columns, found {}", cols.len()),
            });
        }

        let type_id = parse_int(cols[1], line, "type")?;
        records.push(SwcRecord {
            sample_id: parse_int(cols[0], line, "sample id")?,
            type_id: i32::try_from(type_id).map_err(|_| SwcError::Parse {
                line,
                message: format!("type {type_id} out of range"),
            })?,
            coords: [
                parse_float(cols[2], line, "x")?,
                parse_float(cols[3], line, "y")?,
                parse_float(cols[4], line, "z")?,
            ],
            radius: parse_float(cols[5], line, "radius")?,
            parent_id: parse_int(cols[6], line, "parent id")?,
        });
    }

    Ok(records)
}

/// Rebuilds a skeleton from parsed rows.
///
/// Vertex `i` is row `i`. Every row with a positive parent id contributes the
/// edge `(parent row, row)`. The first row without a parent becomes the
/// beginning vertex.
pub fn records_to_skeleton(
    records: &[SwcRecord],
    transform: &CoordinateTransform,
    units: SwcUnits,
) -> Result<SkeletonGraph, SwcError> {
    let mut rows = HashMap::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        if rows.insert(r.sample_id, i).is_some() {
            return Err(SwcError::DuplicateSample(r.sample_id));
        }
    }

    let mut edges = Vec::with_capacity(records.len().saturating_sub(1));
    for (i, r) in records.iter().enumerate() {
        if r.parent_id <= 0 {
            continue;
        }
        let &parent = rows.get(&r.parent_id).ok_or(SwcError::UnknownParent {
            sample_id: r.sample_id,
            parent_id: r.parent_id,
        })?;
        edges.push((parent, i));
    }

    let graph = SkeletonGraph::new(
        records
            .iter()
            .map(|r| from_swc_coords(r.coords, transform, units))
            .collect(),
        edges,
        records.iter().map(|r| r.radius).collect(),
        records.iter().map(|r| r.type_id).collect(),
    )?;

    match records.iter().position(|r| r.parent_id < 0) {
        Some(root) => Ok(graph.with_beginning(root)?),
        None => Ok(graph),
    }
}

fn parse_float(tok: &str, line: usize, what: &str) -> Result<f64, SwcError> {
    tok.parse::<f64>().map_err(|e| SwcError::Parse {
        line,
        message: format!("{what} '{tok}': {e}"),
    })
}

/// Integer column; integral floats such as `3.000000` are accepted.
fn parse_int(tok: &str, line: usize, what: &str) -> Result<i64, SwcError> {
    if let Ok(v) = tok.parse::<i64>() {
        return Ok(v);
    }
    match tok.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        _ => Err(SwcError::Parse {
            line,
            message: format!("{what} '{tok}' is not an integer"),
        }),
    }
}
