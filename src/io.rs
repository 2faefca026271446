//! Loading point sets from text records.
//!
//! A record starts with a line holding the point count `n`, followed by `n`
//! lines of three whitespace-separated coordinates. Blank lines are skipped;
//! anything after the `n`-th point is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::RegistrationError;
use crate::types::{Point, PointSet};

/// Upper bound on capacity reserved from an untrusted point count.
const MAX_PREALLOCATED_POINTS: usize = 4096;

fn parse_error(line: usize, message: impl Into<String>) -> RegistrationError {
    RegistrationError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_point(line_no: usize, text: &str) -> Result<Point, RegistrationError> {
    let mut coords = [0.0f64; 3];
    let mut fields = text.split_whitespace();
    for (axis, slot) in ["x", "y", "z"].iter().zip(coords.iter_mut()) {
        let field = fields
            .next()
            .ok_or_else(|| parse_error(line_no, format!("missing {axis} coordinate")))?;
        let value: f64 = field
            .parse()
            .map_err(|_| parse_error(line_no, format!("invalid {axis} coordinate {field:?}")))?;
        if !value.is_finite() {
            return Err(parse_error(
                line_no,
                format!("non-finite {axis} coordinate {field:?}"),
            ));
        }
        *slot = value;
    }
    if let Some(extra) = fields.next() {
        return Err(parse_error(line_no, format!("unexpected field {extra:?}")));
    }
    Ok(Point::new(coords[0], coords[1], coords[2]))
}

/// Read a point record from any buffered reader.
pub fn read_point_set<R: BufRead>(reader: R) -> Result<PointSet, RegistrationError> {
    let mut expected: Option<usize> = None;
    let mut points = PointSet::new();
    let mut last_line = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        last_line = line_no;
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        match expected {
            None => {
                let count = text
                    .parse::<usize>()
                    .map_err(|_| parse_error(line_no, format!("invalid point count {text:?}")))?;
                points.reserve(count.min(MAX_PREALLOCATED_POINTS));
                expected = Some(count);
            }
            Some(_) => points.push(parse_point(line_no, text)?),
        }
        if expected == Some(points.len()) {
            break;
        }
    }

    let Some(count) = expected else {
        return Err(parse_error(1, "missing point count"));
    };
    if points.len() < count {
        return Err(parse_error(
            last_line + 1,
            format!("expected {count} points, found {}", points.len()),
        ));
    }
    debug!(points = points.len(), "read point set");
    Ok(points)
}

/// Parse a point record held in memory.
pub fn parse_point_set(text: &str) -> Result<PointSet, RegistrationError> {
    read_point_set(text.as_bytes())
}

/// Load a point record from a file.
pub fn load_point_set(path: impl AsRef<Path>) -> Result<PointSet, RegistrationError> {
    let file = File::open(path.as_ref())?;
    read_point_set(BufReader::new(file))
}
