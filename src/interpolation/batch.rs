//! Batch evaluation built from single-point interpolation.

use super::{Interpolation, PointInterpolation};
use crate::{
    error::{check_length, InterpResult},
    field::CellField,
    geometry::{Barycentric, Point3},
    locate::TetIndices,
    num::{BFloat, FieldValue},
};
use rayon::prelude::*;

/// Smallest number of batch elements handled by a single parallel task.
const MIN_ELEMENTS_PER_TASK: usize = 256;

/// An interpolation scheme that evaluates batches by calling the single-point
/// primitives of the wrapped scheme independently for every element.
///
/// Elements are evaluated in parallel. Since no element depends on another,
/// the result does not depend on how the work is split between threads.
#[derive(Clone, Debug)]
pub struct FieldInterpolation<S> {
    scheme: S,
}

impl<S> FieldInterpolation<S> {
    /// Wraps the given single-point scheme.
    pub fn new(scheme: S) -> Self {
        Self { scheme }
    }

    /// Returns a reference to the wrapped scheme.
    pub fn scheme(&self) -> &S {
        &self.scheme
    }
}

impl<F, T, S> Interpolation<F, T> for FieldInterpolation<S>
where
    F: BFloat,
    T: FieldValue<F>,
    S: PointInterpolation<F, T>,
{
    fn scheme_name(&self) -> &'static str {
        self.scheme.scheme_name()
    }

    fn field(&self) -> &CellField<F, T> {
        self.scheme.field()
    }

    fn interpolate(
        &self,
        position: &Point3<F>,
        cell: usize,
        face: Option<usize>,
    ) -> InterpResult<T> {
        self.scheme.interpolate(position, cell, face)
    }

    fn interpolate_batch(
        &self,
        positions: &[Point3<F>],
        cells: &[usize],
        faces: Option<&[Option<usize>]>,
    ) -> InterpResult<Vec<T>> {
        check_length("cell indices", positions.len(), cells.len())?;
        check_face_hint_length(positions.len(), faces)?;
        evaluate_independently(positions.len(), |idx| {
            self.scheme
                .interpolate(&positions[idx], cells[idx], face_hint_at(faces, idx))
        })
    }

    fn interpolate_tet(
        &self,
        coordinates: &Barycentric<F>,
        tet: &TetIndices,
        face: Option<usize>,
    ) -> InterpResult<T> {
        self.scheme.interpolate_tet(coordinates, tet, face)
    }

    fn interpolate_tet_batch(
        &self,
        coordinates: &[Barycentric<F>],
        cells: &[usize],
        tet_faces: &[usize],
        tet_points: &[usize],
        faces: Option<&[Option<usize>]>,
    ) -> InterpResult<Vec<T>> {
        check_tet_batch_lengths(coordinates.len(), cells, tet_faces, tet_points, faces)?;
        evaluate_independently(coordinates.len(), |idx| {
            self.scheme.interpolate_tet(
                &coordinates[idx],
                &TetIndices::new(cells[idx], tet_faces[idx], tet_points[idx]),
                face_hint_at(faces, idx),
            )
        })
    }
}

/// Returns the face hint for the given batch element, if any.
pub fn face_hint_at(faces: Option<&[Option<usize>]>, idx: usize) -> Option<usize> {
    faces.and_then(|faces| faces[idx])
}

/// Returns a `SizeMismatch` error if face hints are given for a different
/// number of elements than `n_elements`.
pub fn check_face_hint_length(
    n_elements: usize,
    faces: Option<&[Option<usize>]>,
) -> InterpResult<()> {
    match faces {
        Some(faces) => check_length("face hints", n_elements, faces.len()),
        None => Ok(()),
    }
}

/// Returns a `SizeMismatch` error unless all the inputs of a barycentric
/// batch have `n_elements` elements.
pub fn check_tet_batch_lengths(
    n_elements: usize,
    cells: &[usize],
    tet_faces: &[usize],
    tet_points: &[usize],
    faces: Option<&[Option<usize>]>,
) -> InterpResult<()> {
    check_length("cell indices", n_elements, cells.len())?;
    check_length("tet face indices", n_elements, tet_faces.len())?;
    check_length("tet point indices", n_elements, tet_points.len())?;
    check_face_hint_length(n_elements, faces)
}

/// Evaluates the given closure for every element index in parallel and
/// collects the results in order.
///
/// If any evaluation fails, the error for the lowest failing index is returned.
pub fn evaluate_independently<T, E>(n_elements: usize, evaluate: E) -> InterpResult<Vec<T>>
where
    T: Send,
    E: Fn(usize) -> InterpResult<T> + Sync + Send,
{
    let results: Vec<InterpResult<T>> = (0..n_elements)
        .into_par_iter()
        .with_min_len(MIN_ELEMENTS_PER_TASK)
        .map(evaluate)
        .collect();
    results.into_iter().collect()
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::error::{IndexKind, InterpolationError};

    #[test]
    fn independent_evaluation_keeps_order() {
        let values = evaluate_independently(10_000, |idx| Ok(idx * 2)).unwrap();
        assert!(values.iter().enumerate().all(|(idx, &value)| value == idx * 2));
    }

    #[test]
    fn independent_evaluation_reports_first_error() {
        let result = evaluate_independently(5_000, |idx| {
            if idx % 1000 == 999 {
                Err(InterpolationError::InvalidIndex {
                    kind: IndexKind::Cell,
                    index: idx,
                    len: 0,
                })
            } else {
                Ok(idx)
            }
        });
        assert_eq!(
            result,
            Err(InterpolationError::InvalidIndex {
                kind: IndexKind::Cell,
                index: 999,
                len: 0
            })
        );
    }

    #[test]
    fn mismatched_batch_lengths_are_detected() {
        assert!(check_tet_batch_lengths(3, &[0, 0, 0], &[1, 1, 1], &[0, 1, 2], None).is_ok());
        assert_eq!(
            check_tet_batch_lengths(3, &[0, 0, 0], &[1, 1], &[0, 1, 2], None),
            Err(InterpolationError::SizeMismatch {
                what: "tet face indices",
                expected: 3,
                actual: 2
            })
        );
        assert!(check_face_hint_length(2, Some(&[None, Some(1), None][..])).is_err());
    }
}
