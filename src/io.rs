//! Text-table I/O for pose sequences and pseudo-IMU samples.
//!
//! Pose tables hold one pose per row, `t tx ty tz qx qy qz qw`, separated
//! by whitespace or commas. The delimiter is detected from the first data
//! row. Any line containing `%` is a comment.
//!
//! The inertial table written by [`write_inertial_samples`] is
//! `t, wx, wy, wz, ax, ay, az` with the timestamp at 20 significant digits
//! and every other column at 6.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};

use crate::error::{ResampleError, Result};
use crate::pose::StampedPose;
use crate::sample::KinematicSample;

/// Header line of the inertial output table.
pub const INERTIAL_HEADER: &str =
    "%%timestamp(sec), $\\Omega_{is}^s$(rad/sec), $a_{is}^w$(m/s^2)";

/// Header line of the resampled pose table.
pub const POSE_HEADER: &str = "% time[sec] tx[m] ty[m] tz[m] qx qy qz qw";

/// File name used when no inertial output path is given.
pub const DEFAULT_INERTIAL_FILE: &str = "UpsampledPseudoImu.csv";

/// File name used for the resampled poses next to the input.
pub const DEFAULT_POSE_FILE: &str = "UpsampledFrameTrajectory.txt";

/// Significant digits for timestamps.
pub const TIMESTAMP_DIGITS: usize = 20;

/// Significant digits for angular rate and acceleration.
pub const MEASUREMENT_DIGITS: usize = 6;

/// Significant digits for resampled pose components.
pub const POSE_DIGITS: usize = 9;

/// Lines shorter than this end the table.
const MIN_LINE_LEN: usize = 8;

/// Number of numeric fields in a pose row.
const POSE_FIELDS: usize = 8;

/// Field separator of a pose table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Fields separated by `,` (surrounding whitespace allowed).
    Comma,
    /// Fields separated by runs of spaces or tabs.
    Whitespace,
}

impl Delimiter {
    /// Detect the delimiter of a data row: more than six commas means comma
    /// separated.
    #[must_use]
    pub fn detect(line: &str) -> Self {
        if line.matches(',').count() > POSE_FIELDS - 2 {
            Self::Comma
        } else {
            Self::Whitespace
        }
    }

    /// Separator byte handed to the csv reader.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Whitespace => b' ',
        }
    }
}

/// How the loader reacts to an unparseable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Stop at the first malformed row and keep what was read.
    #[default]
    Lenient,
    /// Fail with [`ResampleError::MalformedRow`].
    Strict,
}

/// Read a pose table from `path`, stopping at the first malformed row.
///
/// # Errors
///
/// Returns [`ResampleError::Io`] if the file cannot be read.
pub fn read_pose_table(path: impl AsRef<Path>) -> Result<Vec<StampedPose>> {
    read_pose_table_with_mode(path, ParseMode::Lenient)
}

/// Read a pose table from `path`, failing on the first malformed row.
///
/// # Errors
///
/// Returns [`ResampleError::Io`] on read failure and
/// [`ResampleError::MalformedRow`] on a row that does not parse.
pub fn read_pose_table_strict(path: impl AsRef<Path>) -> Result<Vec<StampedPose>> {
    read_pose_table_with_mode(path, ParseMode::Strict)
}

/// Read a pose table from `path` with an explicit [`ParseMode`].
///
/// # Errors
///
/// See [`parse_pose_table`].
pub fn read_pose_table_with_mode(
    path: impl AsRef<Path>,
    mode: ParseMode,
) -> Result<Vec<StampedPose>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let poses = parse_pose_table(BufReader::new(file), mode)?;
    debug!("loaded {} poses from {}", poses.len(), path.display());
    Ok(poses)
}

/// Parse a pose table from any buffered reader.
///
/// Comment lines (containing `%`) are skipped. A line shorter than 8
/// characters ends the table in both modes. A line that is not valid UTF-8
/// counts as a malformed row.
///
/// # Errors
///
/// Returns [`ResampleError::Io`] on read failure, and in
/// [`ParseMode::Strict`] also [`ResampleError::MalformedRow`].
pub fn parse_pose_table<R: BufRead>(mut reader: R, mode: ParseMode) -> Result<Vec<StampedPose>> {
    let mut poses = Vec::new();
    let mut delimiter = None;
    let mut buf = Vec::new();

    for line_no in 1usize.. {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        if buf.contains(&b'%') {
            continue;
        }
        let row = trim_line_end(&buf);
        if row.len() < MIN_LINE_LEN {
            break;
        }

        let parsed = std::str::from_utf8(row)
            .map_err(|err| ResampleError::malformed_row(line_no, format!("invalid UTF-8: {err}")))
            .and_then(|line| {
                let delim = *delimiter.get_or_insert_with(|| Delimiter::detect(line));
                parse_pose_row(line, delim, line_no)
            });

        match parsed {
            Ok(pose) => poses.push(pose),
            Err(err) => match mode {
                ParseMode::Strict => return Err(err),
                ParseMode::Lenient => {
                    warn!("stopping pose table at line {line_no}: {err}");
                    break;
                }
            },
        }
    }

    Ok(poses)
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &line[..end]
}

/// Parse one data row into a pose.
///
/// Comma rows keep empty fields, so a blank column is reported instead of
/// shifting the ones after it. Whitespace rows collapse runs of blanks.
fn parse_pose_row(line: &str, delimiter: Delimiter, line_no: usize) -> Result<StampedPose> {
    let record = read_record(line, delimiter)
        .map_err(|err| ResampleError::malformed_row(line_no, err.to_string()))?
        .unwrap_or_default();

    let fields: Vec<&str> = match delimiter {
        Delimiter::Comma => record.iter().collect(),
        Delimiter::Whitespace => record.iter().filter(|f| !f.is_empty()).collect(),
    };

    if fields.len() < POSE_FIELDS {
        return Err(ResampleError::malformed_row(
            line_no,
            format!("expected {POSE_FIELDS} fields, got {}", fields.len()),
        ));
    }

    let mut values = [0.0; POSE_FIELDS];
    for (slot, field) in values.iter_mut().zip(&fields) {
        *slot = field.parse::<f64>().map_err(|_| {
            ResampleError::malformed_row(line_no, format!("'{field}' is not a number"))
        })?;
    }

    let [t, tx, ty, tz, qx, qy, qz, qw] = values;
    StampedPose::from_components(t, [tx, ty, tz], [qx, qy, qz, qw])
        .map_err(|err| ResampleError::malformed_row(line_no, err.to_string()))
}

/// Split a single line into fields with the csv reader.
fn read_record(line: &str, delimiter: Delimiter) -> csv::Result<Option<StringRecord>> {
    let line = match delimiter {
        Delimiter::Comma => Cow::Borrowed(line),
        Delimiter::Whitespace => Cow::Owned(line.replace('\t', " ")),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter.as_byte())
        .from_reader(line.as_bytes());
    let record = reader.records().next().transpose();
    record
}

/// Write pseudo-IMU samples to `path`.
///
/// # Errors
///
/// Returns [`ResampleError::Io`] if the file cannot be created or written.
pub fn write_inertial_samples(path: impl AsRef<Path>, samples: &[KinematicSample]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_inertial_samples_to(&mut writer, samples)?;
    writer.flush()?;
    debug!("wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}

/// Write pseudo-IMU samples to any writer.
///
/// # Errors
///
/// Returns [`ResampleError::Io`] on write failure.
pub fn write_inertial_samples_to<W: Write>(
    writer: &mut W,
    samples: &[KinematicSample],
) -> Result<()> {
    writeln!(writer, "{INERTIAL_HEADER}")?;
    for sample in samples {
        let row = sample.to_imu_row();
        write!(writer, "{}", format_general(row[0], TIMESTAMP_DIGITS))?;
        for value in &row[1..] {
            write!(writer, ",{}", format_general(*value, MEASUREMENT_DIGITS))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write resampled poses to `path` in the input table layout.
///
/// # Errors
///
/// Returns [`ResampleError::Io`] if the file cannot be created or written.
pub fn write_pose_table(path: impl AsRef<Path>, poses: &[StampedPose]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_pose_table_to(&mut writer, poses)?;
    writer.flush()?;
    debug!("wrote {} poses to {}", poses.len(), path.display());
    Ok(())
}

/// Write resampled poses to any writer, space separated.
///
/// # Errors
///
/// Returns [`ResampleError::Io`] on write failure.
pub fn write_pose_table_to<W: Write>(writer: &mut W, poses: &[StampedPose]) -> Result<()> {
    writeln!(writer, "{POSE_HEADER}")?;
    for pose in poses {
        let row = pose.to_row();
        write!(writer, "{}", format_general(row[0], TIMESTAMP_DIGITS))?;
        for value in &row[1..] {
            write!(writer, " {}", format_general(*value, POSE_DIGITS))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Default inertial output path: next to the pose file.
#[must_use]
pub fn default_inertial_path(pose_file: &Path) -> PathBuf {
    sibling_path(pose_file, DEFAULT_INERTIAL_FILE)
}

/// Default resampled-pose output path: next to the pose file.
#[must_use]
pub fn default_pose_path(pose_file: &Path) -> PathBuf {
    sibling_path(pose_file, DEFAULT_POSE_FILE)
}

fn sibling_path(file: &Path, name: &str) -> PathBuf {
    file.parent()
        .map_or_else(|| PathBuf::from(name), |dir| dir.join(name))
}

/// Format `value` with `digits` significant digits, like C's `%g`.
///
/// Fixed notation is used for decimal exponents in `[-4, digits)`,
/// scientific otherwise; trailing zeros are removed.
#[must_use]
pub fn format_general(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);
    let sci = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= digits as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
