//! Errors reported by interpolation queries and scheme construction.

use std::{fmt, io};

/// The kind of mesh entity an index refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    Cell,
    Face,
    Point,
    TetPoint,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Cell => "cell",
                Self::Face => "face",
                Self::Point => "point",
                Self::TetPoint => "tet point",
            }
        )
    }
}

/// Error during interpolation or construction of an interpolation scheme.
///
/// None of these are recovered from internally.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InterpolationError {
    /// An index outside the valid range.
    #[error("{kind} index {index} is out of range (valid range is 0..{len})")]
    InvalidIndex {
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    /// A face hint that does not belong to the queried cell.
    #[error("Face {face} is not a face of cell {cell}")]
    FaceNotOnCell { face: usize, cell: usize },

    /// All candidate tetrahedra of the cell have negligible volume.
    #[error("All candidate tetrahedra of cell {cell} are degenerate")]
    DegenerateGeometry { cell: usize },

    /// Input sequences of unequal length.
    #[error("Number of {what} ({actual}) does not match the expected number ({expected})")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A scheme name that is not registered for the requested value type.
    #[error(
        "Unknown interpolation scheme `{name}` for {value_type} fields, valid schemes are: {}",
        .known.join(", ")
    )]
    UnknownScheme {
        name: String,
        value_type: &'static str,
        known: Vec<&'static str>,
    },

    /// The point lies outside every tetrahedron of the cell and outside points are rejected.
    #[error(
        "Point lies outside cell {cell} (smallest barycentric coordinate is {min_coordinate:e})"
    )]
    PointOutsideCell { cell: usize, min_coordinate: f64 },

    /// Mesh connectivity that violates the mesh invariants.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),
}

/// Result of an interpolation operation.
pub type InterpResult<T> = Result<T, InterpolationError>;

impl From<InterpolationError> for io::Error {
    fn from(err: InterpolationError) -> Self {
        let kind = match err {
            InterpolationError::UnknownScheme { .. } | InterpolationError::InvalidMesh(_) => {
                io::ErrorKind::InvalidData
            }
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

/// Returns an `InvalidIndex` error unless `index < len`.
pub fn check_index(kind: IndexKind, index: usize, len: usize) -> InterpResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(InterpolationError::InvalidIndex { kind, index, len })
    }
}

/// Returns a `SizeMismatch` error unless the lengths are equal.
pub fn check_length(what: &'static str, expected: usize, actual: usize) -> InterpResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(InterpolationError::SizeMismatch {
            what,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn unknown_scheme_message_lists_known_schemes() {
        let err = InterpolationError::UnknownScheme {
            name: "doesNotExist".to_string(),
            value_type: "scalar",
            known: vec!["cell", "cell_point"],
        };
        let message = err.to_string();
        assert!(message.contains("`doesNotExist`"));
        assert!(message.contains("cell, cell_point"));
    }

    #[test]
    fn conversion_to_io_error_keeps_message() {
        let err: io::Error = InterpolationError::DegenerateGeometry { cell: 3 }.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("cell 3"));
    }

    #[test]
    fn index_checks_work() {
        assert!(check_index(IndexKind::Cell, 2, 3).is_ok());
        assert_eq!(
            check_index(IndexKind::Cell, 3, 3),
            Err(InterpolationError::InvalidIndex {
                kind: IndexKind::Cell,
                index: 3,
                len: 3
            })
        );
        assert!(check_length("cell indices", 5, 4).is_err());
    }
}
