//! Piecewise constant interpolation.

use super::{
    batch::{check_face_hint_length, check_tet_batch_lengths, face_hint_at},
    Interpolation,
};
use crate::{
    error::{check_length, InterpResult},
    field::CellField,
    geometry::{Barycentric, Point3},
    locate::TetIndices,
    num::{BFloat, FieldValue},
};

/// Interpolation scheme that returns the value of the cell containing the position.
#[derive(Clone, Debug)]
pub struct CellInterpolation<'a, F: BFloat, T: FieldValue<F>> {
    field: &'a CellField<F, T>,
}

impl<'a, F, T> CellInterpolation<'a, F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    pub const NAME: &'static str = "cell";

    /// Creates a new piecewise constant interpolator for the given field.
    pub fn new(field: &'a CellField<F, T>) -> Self {
        Self { field }
    }

    fn cell_value(&self, cell: usize, face: Option<usize>) -> InterpResult<T> {
        let mesh = self.field.mesh();
        match face {
            Some(face) => mesh.check_cell_face(cell, face)?,
            None => mesh.check_cell(cell)?,
        }
        Ok(self.field.value(cell))
    }
}

impl<'a, F, T> Interpolation<F, T> for CellInterpolation<'a, F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    fn scheme_name(&self) -> &'static str {
        Self::NAME
    }

    fn field(&self) -> &CellField<F, T> {
        self.field
    }

    fn interpolate(
        &self,
        _position: &Point3<F>,
        cell: usize,
        face: Option<usize>,
    ) -> InterpResult<T> {
        self.cell_value(cell, face)
    }

    fn interpolate_batch(
        &self,
        positions: &[Point3<F>],
        cells: &[usize],
        faces: Option<&[Option<usize>]>,
    ) -> InterpResult<Vec<T>> {
        check_length("cell indices", positions.len(), cells.len())?;
        check_face_hint_length(positions.len(), faces)?;
        // Values do not depend on the positions, so a plain gather suffices
        cells
            .iter()
            .enumerate()
            .map(|(idx, &cell)| self.cell_value(cell, face_hint_at(faces, idx)))
            .collect()
    }

    fn interpolate_tet(
        &self,
        _coordinates: &Barycentric<F>,
        tet: &TetIndices,
        face: Option<usize>,
    ) -> InterpResult<T> {
        tet.validate(self.field.mesh())?;
        self.cell_value(tet.cell(), face)
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
        let mesh = self.field.mesh();
        cells
            .iter()
            .zip(tet_faces)
            .zip(tet_points)
            .enumerate()
            .map(|(idx, ((&cell, &tet_face), &tet_point))| {
                TetIndices::new(cell, tet_face, tet_point).validate(mesh)?;
                self.cell_value(cell, face_hint_at(faces, idx))
            })
            .collect()
    }
}
