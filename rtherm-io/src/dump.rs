//! Dimension-prefixed plain-text array dumps
//!
//! A dump is a sequence of whitespace-separated tokens (conventionally one per
//! line):
//!
//! ```text
//! <number of dimensions>
//! <extent of axis 0>
//! ...
//! <extent of axis n-1>
//! <values in row-major order, product of the extents of them>
//! ```
//!
//! A land-cover grid is a 2-dimensional dump `rows, cols`; an hourly temperature
//! stack is a 3-dimensional dump `steps, rows, cols`.
//!
//! # Examples
//!
//! ```rust
//! use rtherm_io::dump::{read_field_2d, write_field_2d};
//! use rtherm_core::land_cover::LandCover;
//! use ndarray::array;
//!
//! let land_cover = LandCover::from_array(array![[13, 0], [0, 13]]).unwrap();
//! let mut buffer = Vec::new();
//! write_field_2d(&mut buffer, &land_cover).unwrap();
//! assert_eq!(String::from_utf8(buffer.clone()).unwrap(), "2\n2\n2\n13\n0\n0\n13\n");
//!
//! let read_back: LandCover = read_field_2d(buffer.as_slice()).unwrap();
//! assert_eq!(read_back, land_cover);
//! ```

use crate::errors::{DumpError, DumpResult};
use ndarray::{ArrayView, Dimension};
use rtherm_core::field::{FloatValue, ScalarField2D, ScalarField3D};
use rtherm_core::grid::GridShape;
use rtherm_core::land_cover::LandCover;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

// Upper bound on the values reserved up front; the declared count is not trusted
const MAX_PREALLOCATED_VALUES: usize = 1 << 20;

/// Read a 2-dimensional dump into a field
pub fn read_field_2d<T: FromStr, R: BufRead>(reader: R) -> DumpResult<ScalarField2D<T>> {
    let mut tokens = Tokens::new(reader);
    let extents = read_header(&mut tokens, 2)?;
    let shape = GridShape::new(extents[0], extents[1]);
    let count = value_count(&extents)?;
    let values = read_values(&mut tokens, count)?;
    Ok(ScalarField2D::from_shape_vec(shape, values)?)
}

/// Read a 3-dimensional `(steps, rows, cols)` dump into a field
pub fn read_field_3d<R: BufRead>(reader: R) -> DumpResult<ScalarField3D> {
    let mut tokens = Tokens::new(reader);
    let extents = read_header(&mut tokens, 3)?;
    let shape = GridShape::new(extents[1], extents[2]);
    let count = value_count(&extents)?;
    let values = read_values::<FloatValue, _>(&mut tokens, count)?;
    Ok(ScalarField3D::from_shape_vec(extents[0], shape, values)?)
}

/// Write any array as a dump, one token per line
pub fn write_array<T, D, W>(writer: &mut W, array: ArrayView<'_, T, D>) -> DumpResult<()>
where
    T: Display,
    D: Dimension,
    W: Write + ?Sized,
{
    writeln!(writer, "{}", array.ndim())?;
    for extent in array.shape() {
        writeln!(writer, "{}", extent)?;
    }
    for value in array.iter() {
        writeln!(writer, "{}", value)?;
    }
    Ok(())
}

pub fn write_field_2d<T: Display, W: Write + ?Sized>(
    writer: &mut W,
    field: &ScalarField2D<T>,
) -> DumpResult<()> {
    write_array(writer, field.view())
}

pub fn write_field_3d<W: Write + ?Sized>(writer: &mut W, field: &ScalarField3D) -> DumpResult<()> {
    write_array(writer, field.view())
}

/// Load a land-cover grid from a dump file
pub fn load_land_cover(path: impl AsRef<Path>) -> DumpResult<LandCover> {
    read_field_2d(BufReader::new(File::open(path)?))
}

/// Load an hourly `(steps, rows, cols)` temperature stack from a dump file
pub fn load_field_3d(path: impl AsRef<Path>) -> DumpResult<ScalarField3D> {
    read_field_3d(BufReader::new(File::open(path)?))
}

/// Save any array to a dump file, replacing an existing file
pub fn save_array<T, D>(path: impl AsRef<Path>, array: ArrayView<'_, T, D>) -> DumpResult<()>
where
    T: Display,
    D: Dimension,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_array(&mut writer, array)?;
    writer.flush()?;
    Ok(())
}

fn read_header<R: BufRead>(tokens: &mut Tokens<R>, rank: usize) -> DumpResult<Vec<usize>> {
    let found: usize = tokens
        .parse_next("dimension count")?
        .ok_or(DumpError::UnexpectedEof("dimension count"))?;
    if found != rank {
        return Err(DumpError::WrongRank {
            expected: rank,
            found,
        });
    }
    (0..rank)
        .map(|_| {
            tokens
                .parse_next::<usize>("array extent")?
                .ok_or(DumpError::UnexpectedEof("array extents"))
        })
        .collect()
}

/// Number of values declared by `extents`
fn value_count(extents: &[usize]) -> DumpResult<usize> {
    extents
        .iter()
        .try_fold(1usize, |count, &extent| count.checked_mul(extent))
        .ok_or_else(|| DumpError::TooLarge {
            extents: extents.to_vec(),
        })
}

fn read_values<T: FromStr, R: BufRead>(tokens: &mut Tokens<R>, count: usize) -> DumpResult<Vec<T>> {
    let mut values = Vec::with_capacity(count.min(MAX_PREALLOCATED_VALUES));
    while values.len() < count {
        match tokens.parse_next(std::any::type_name::<T>())? {
            Some(value) => values.push(value),
            None => {
                return Err(DumpError::Truncated {
                    expected: count,
                    found: values.len(),
                })
            }
        }
    }
    if tokens.next_token()?.is_some() {
        return Err(DumpError::TrailingData { expected: count });
    }
    Ok(values)
}

/// Whitespace-separated tokens, read a line at a time
struct Tokens<R> {
    reader: R,
    line: String,
    // Remaining tokens of the current line, reversed so that `pop` yields the next one
    pending: Vec<String>,
    consumed: usize,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pending: Vec::new(),
            consumed: 0,
        }
    }

    /// The next token and its zero-based position in the stream
    fn next_token(&mut self) -> DumpResult<Option<(usize, String)>> {
        while self.pending.is_empty() {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.pending = self
                .line
                .split_whitespace()
                .rev()
                .map(str::to_owned)
                .collect();
        }
        let index = self.consumed;
        self.consumed += 1;
        Ok(self.pending.pop().map(|token| (index, token)))
    }

    fn parse_next<T: FromStr>(&mut self, expected: &'static str) -> DumpResult<Option<T>> {
        match self.next_token()? {
            None => Ok(None),
            Some((index, token)) => match token.parse() {
                Ok(value) => Ok(Some(value)),
                Err(_) => Err(DumpError::Parse {
                    index,
                    token,
                    expected,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rtherm_core::errors::RthermError;
    use rtherm_core::grid::GridIndex;

    #[test]
    fn test_read_2d_float_field() {
        let text = "2\n2\n3\n1.5\n2\n-3.25\n4e1\nnan\n6\n";
        let field: ScalarField2D = read_field_2d(text.as_bytes()).unwrap();

        assert_eq!(field.shape(), GridShape::new(2, 3));
        assert_eq!(field.get(GridIndex::new(0, 2)), Some(&-3.25));
        assert_eq!(field.get(GridIndex::new(1, 0)), Some(&40.0));
        assert!(field.get(GridIndex::new(1, 1)).unwrap().is_nan());
    }

    #[test]
    fn test_tokens_may_share_lines() {
        let text = "2 1 2\n13 0\n";
        let field: LandCover = read_field_2d(text.as_bytes()).unwrap();
        assert_eq!(field.view(), array![[13, 0]]);
    }

    #[test]
    fn test_read_3d_layer_major() {
        let text = "3\n2\n1\n2\n1\n2\n3\n4\n";
        let field = read_field_3d(text.as_bytes()).unwrap();

        assert_eq!(field.steps(), 2);
        assert_eq!(field.grid_shape(), GridShape::new(1, 2));
        assert_eq!(field.layer(1).unwrap(), array![[3.0, 4.0]]);
    }

    #[test]
    fn test_written_3d_field_reads_back() {
        let field = ScalarField3D::from_array(array![
            [[280.5, 281.0], [279.25, 290.0]],
            [[282.0, 283.125], [278.0, 291.5]]
        ])
        .unwrap();

        let mut buffer = Vec::new();
        write_field_3d(&mut buffer, &field).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("3\n2\n2\n2\n280.5\n281\n"));

        let read_back = read_field_3d(text.as_bytes()).unwrap();
        assert_eq!(read_back, field);
    }

    #[test]
    fn test_wrong_rank() {
        let err = read_field_3d("2\n1\n1\n5\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DumpError::WrongRank {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_truncated_values() {
        let err = read_field_2d::<FloatValue, _>("2\n2\n2\n1\n2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DumpError::Truncated {
                expected: 4,
                found: 3
            }
        ));
    }

    #[test]
    fn test_trailing_values() {
        let err = read_field_2d::<FloatValue, _>("2\n1\n1\n1\n2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DumpError::TrailingData { expected: 1 }));
    }

    #[test]
    fn test_unparseable_token_reports_position() {
        let err = read_field_2d::<i32, _>("2\n1\n2\n13\nurban\n".as_bytes()).unwrap_err();
        match err {
            DumpError::Parse { index, token, .. } => {
                assert_eq!(index, 4);
                assert_eq!(token, "urban");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input() {
        let err = read_field_2d::<i32, _>("".as_bytes()).unwrap_err();
        assert!(matches!(err, DumpError::UnexpectedEof("dimension count")));

        let err = read_field_2d::<i32, _>("2\n4\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DumpError::UnexpectedEof("array extents")));
    }

    #[test]
    fn test_overflowing_extents_are_rejected() {
        let err = read_field_2d::<i32, _>("2\n99999999999\n99999999999\n".as_bytes()).unwrap_err();
        match err {
            DumpError::TooLarge { extents } => {
                assert_eq!(extents, vec![99999999999, 99999999999]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let text = format!("3\n2\n{}\n2\n", usize::MAX);
        let err = read_field_3d(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DumpError::TooLarge { .. }));
    }

    #[test]
    fn test_huge_declared_count_is_not_preallocated() {
        let err = read_field_3d("3\n100000\n100000\n100000\n1\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DumpError::Truncated {
                expected: 1_000_000_000_000_000,
                found: 1
            }
        ));
    }

    #[test]
    fn test_empty_axis_is_a_field_error() {
        let err = read_field_2d::<i32, _>("2\n0\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DumpError::Field(RthermError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_write_generic_array() {
        let values = array![[1.25, 2.5, 3.0]];
        let mut buffer = Vec::new();
        write_array(&mut buffer, values.view()).unwrap();

        let read_back: ScalarField2D = read_field_2d(buffer.as_slice()).unwrap();
        assert_relative_eq!(read_back.view()[[0, 1]], 2.5);
    }

    #[test]
    fn test_files_round_trip() {
        let dir = std::env::temp_dir().join(format!("rtherm-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("land_cover.txt");

        let land_cover = LandCover::from_array(array![[13, 1], [2, 13], [0, 0]]).unwrap();
        save_array(&path, land_cover.view()).unwrap();
        assert_eq!(load_land_cover(&path).unwrap(), land_cover);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
