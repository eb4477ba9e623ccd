//! Cell-point interpolation with face centre values interpolated directly
//! from the neighbouring cells.

use super::{cell_point::CellPointInterpolation, PointInterpolation};
use crate::{
    field::CellField,
    locate::{LocatorConfig, TetIndices, TetLocator},
    num::{BFloat, FieldValue},
    reconstruction::reconstruct_face_values,
};

/// Interpolation scheme that is linear within each tetrahedron of a cell,
/// like `CellPointInterpolation`, but with face centre values obtained by
/// distance weighted interpolation between the owner and neighbour cell values.
#[derive(Clone, Debug)]
pub struct CellPointFaceInterpolation<'a, F: BFloat, T: FieldValue<F>> {
    cell_point: CellPointInterpolation<'a, F, T>,
}

impl<'a, F, T> CellPointFaceInterpolation<'a, F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    pub const NAME: &'static str = "cell_point_face";

    /// Creates a new cell-point-face interpolator for the given field.
    pub fn new(field: &'a CellField<F, T>, config: &LocatorConfig<F>) -> Self {
        let face_values = reconstruct_face_values(field);
        Self {
            cell_point: CellPointInterpolation::with_face_values(field, config, face_values),
        }
    }

    /// Returns a reference to the underlying cell-point interpolator.
    pub fn cell_point(&self) -> &CellPointInterpolation<'a, F, T> {
        &self.cell_point
    }
}

impl<'a, F, T> PointInterpolation<F, T> for CellPointFaceInterpolation<'a, F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    fn scheme_name(&self) -> &'static str {
        Self::NAME
    }

    fn field(&self) -> &CellField<F, T> {
        self.cell_point.field()
    }

    fn locator(&self) -> &TetLocator<'_, F> {
        self.cell_point.locator()
    }

    fn tet_vertex_values(&self, tet: &TetIndices) -> [T; 4] {
        self.cell_point.tet_vertex_values(tet)
    }
}
