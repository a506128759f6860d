use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::propagator::{StateVector, Trajectory};

use super::error::TableError;
use super::input::parse_number;

pub const HEADER: &str = "Time(s) X(m) Y(m) Z(m) Vx(m/s) Vy(m/s) Vz(m/s)";
const COLUMNS: [&str; 7] = ["Time", "X", "Y", "Z", "Vx", "Vy", "Vz"];

/// One row of the trajectory table, as read back by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableRow {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

impl TableRow {
    pub fn max_abs_coordinate(&self) -> f64 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }
}

impl From<&StateVector> for TableRow {
    fn from(state: &StateVector) -> Self {
        TableRow {
            time: state.time_s,
            x: state.position.x,
            y: state.position.y,
            z: state.position.z,
            vx: state.velocity.x,
            vy: state.velocity.y,
            vz: state.velocity.z,
        }
    }
}

pub fn write_table<W: Write>(trajectory: &Trajectory, mut out: W) -> Result<(), TableError> {
    writeln!(out, "{}", HEADER)?;
    for state in trajectory.iter() {
        let p = state.position;
        let v = state.velocity;
        writeln!(
            out,
            "{:>22} {:>22.12e} {:>22.12e} {:>22.12e} {:>22.12e} {:>22.12e} {:>22.12e}",
            state.time_s, p.x, p.y, p.z, v.x, v.y, v.z
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Writes the table next to `path` under a unique temporary name and renames
/// it into place, so readers only ever see a complete file.
pub fn write_table_file(trajectory: &Trajectory, path: &Path) -> Result<(), TableError> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file path", path.display()),
        )
    })?;
    let folder = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(folder)?;

    let tmp_path = folder.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4()
    ));

    let written = File::create(&tmp_path)
        .map_err(TableError::from)
        .and_then(|file| write_table(trajectory, BufWriter::new(file)));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path)?;
    log::debug!("wrote {} rows to {}", trajectory.len(), path.display());
    Ok(())
}

/// Reads a trajectory table: one header line, then seven numeric columns per
/// row. Blank lines are skipped.
pub fn read_table<R: BufRead>(reader: R) -> Result<Vec<TableRow>, TableError> {
    let mut lines = reader.lines();
    match lines.next() {
        Some(header) => {
            header?;
        }
        None => return Err(TableError::MissingHeader),
    }

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != COLUMNS.len() {
            return Err(TableError::ColumnCount {
                line: index + 2,
                expected: COLUMNS.len(),
                found: tokens.len(),
            });
        }

        let mut values = [0.0; 7];
        for ((slot, column), token) in values.iter_mut().zip(COLUMNS).zip(&tokens) {
            *slot = parse_number(column, token)?;
        }
        let [time, x, y, z, vx, vy, vz] = values;
        rows.push(TableRow {
            time,
            x,
            y,
            z,
            vx,
            vy,
            vz,
        });
    }
    Ok(rows)
}

pub fn read_table_file(path: &Path) -> Result<Vec<TableRow>, TableError> {
    let file = File::open(path)?;
    read_table(BufReader::new(file))
}
