/*!
 * Integer List Files
 * Input and output files of the driver binary
 */

use crate::core::errors::{InputError, InputResult};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Read whitespace-separated signed integers
///
/// A token that is not an integer fails the whole read, naming the token.
pub fn read_integers(path: impl AsRef<Path>) -> InputResult<Vec<i64>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    text.split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            token.parse().map_err(|_| InputError::Parse {
                path: path.to_path_buf(),
                token: token.to_string(),
                position,
            })
        })
        .collect()
}

/// Write one integer per line
pub fn write_integers(path: impl AsRef<Path>, values: &[i64]) -> InputResult<()> {
    let path = path.as_ref();
    write_with(path, |out| {
        for value in values {
            writeln!(out, "{value}")?;
        }
        Ok(())
    })
}

/// Write a single count on its own line
pub fn write_count(path: impl AsRef<Path>, count: u64) -> InputResult<()> {
    let path = path.as_ref();
    write_with(path, |out| writeln!(out, "{count}"))
}

fn write_with(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<fs::File>) -> std::io::Result<()>,
) -> InputResult<()> {
    let wrap = |source: std::io::Error| InputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut out = BufWriter::new(fs::File::create(path).map_err(wrap)?);
    body(&mut out).map_err(wrap)?;
    out.flush().map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "1 2\nthree 4").unwrap();

        match read_integers(&path) {
            Err(InputError::Parse { token, position, .. }) => {
                assert_eq!(token, "three");
                assert_eq!(position, 2);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_integers(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
    }
}
