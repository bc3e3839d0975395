//! `.poly` artifacts: one persisted counting polynomial per file.

use std::path::{Path, PathBuf};

use crate::algebra::{ExprError, Symbol};
use crate::polynomial::CountingPolynomial;

/// File extension of polynomial artifacts.
pub const POLY_EXTENSION: &str = "poly";

/// Error type for `.poly` files.
#[derive(Debug, thiserror::Error)]
pub enum PolyFileError {
    /// Reading or writing failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file does not hold a valid expression.
    #[error("Invalid polynomial in {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Parse failure.
        source: ExprError,
    },
}

/// Write the fully symbolic form of `polynomial`.
pub fn write_poly(path: impl AsRef<Path>, polynomial: &CountingPolynomial) -> Result<(), PolyFileError> {
    let mut text = polynomial.for_persistence();
    text.push('\n');
    std::fs::write(path, text)?;
    Ok(())
}

/// Read a polynomial in `variable` back from a `.poly` file.
pub fn read_poly(path: impl AsRef<Path>, variable: Symbol) -> Result<CountingPolynomial, PolyFileError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    CountingPolynomial::parse(variable, text.trim()).map_err(|source| PolyFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The `.poly` path next to a `.graph` file.
pub fn poly_path_for(graph_path: impl AsRef<Path>) -> PathBuf {
    graph_path.as_ref().with_extension(POLY_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poly_path() {
        assert_eq!(poly_path_for("graphs/tri.graph"), PathBuf::from("graphs/tri.poly"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.poly");
        let n = CountingPolynomial::parse(Symbol::new("T"), "3*T**2/(4*t_0) + 1").unwrap();
        write_poly(&path, &n).unwrap();
        assert_eq!(read_poly(&path, Symbol::new("T")).unwrap(), n);
    }

    #[test]
    fn test_invalid_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.poly");
        std::fs::write(&path, "T +* 2").unwrap();
        assert!(matches!(
            read_poly(&path, Symbol::new("T")),
            Err(PolyFileError::Parse { .. })
        ));
    }
}
