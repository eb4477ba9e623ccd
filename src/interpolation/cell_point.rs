//! Linear interpolation over the tetrahedral decomposition of cells, using
//! values reconstructed at the mesh points.

use super::PointInterpolation;
use crate::{
    error::{check_length, InterpResult},
    field::CellField,
    locate::{LocatorConfig, TetIndices, TetLocator},
    num::{BFloat, FieldValue},
    reconstruction::reconstruct_point_values,
};
use ndarray::prelude::*;

/// Interpolation scheme that is linear within each tetrahedron of a cell.
///
/// The tetrahedron vertices get the cell value, the face centre value and the
/// values at the two face points. Point values are reconstructed from the
/// surrounding cells, and face centre values are the mean of the values at
/// the face points. Since the face vertex values only depend on the face,
/// the interpolated value is continuous across faces shared by two cells.
#[derive(Clone, Debug)]
pub struct CellPointInterpolation<'a, F: BFloat, T: FieldValue<F>> {
    field: &'a CellField<F, T>,
    locator: TetLocator<'a, F>,
    point_values: Array1<T>,
    face_values: Array1<T>,
}

impl<'a, F, T> CellPointInterpolation<'a, F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    pub const NAME: &'static str = "cell_point";

    /// Creates a new cell-point interpolator for the given field.
    ///
    /// The point and face centre values are computed once here.
    pub fn new(field: &'a CellField<F, T>, config: &LocatorConfig<F>) -> Self {
        let point_values = reconstruct_point_values(field);
        let face_values = Self::average_face_point_values(field, &point_values);
        Self {
            field,
            locator: TetLocator::new(field.mesh(), *config),
            point_values,
            face_values,
        }
    }

    /// Creates a new interpolator with reconstructed point values and the given
    /// face centre values, which must have one value per mesh face.
    pub(super) fn with_face_values(
        field: &'a CellField<F, T>,
        config: &LocatorConfig<F>,
        face_values: Array1<T>,
    ) -> Self {
        Self {
            field,
            locator: TetLocator::new(field.mesh(), *config),
            point_values: reconstruct_point_values(field),
            face_values,
        }
    }

    /// Creates a new interpolator using the given precomputed point and face
    /// centre values.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the new interpolator.
    /// - `Err`: Contains a `SizeMismatch` error if there is not one value per
    /// mesh point and one value per mesh face.
    pub fn with_values(
        field: &'a CellField<F, T>,
        config: &LocatorConfig<F>,
        point_values: Array1<T>,
        face_values: Array1<T>,
    ) -> InterpResult<Self> {
        let mesh = field.mesh();
        check_length("point values", mesh.n_points(), point_values.len())?;
        check_length("face values", mesh.n_faces(), face_values.len())?;
        Ok(Self {
            field,
            locator: TetLocator::new(mesh, *config),
            point_values,
            face_values,
        })
    }

    /// Returns a view of the reconstructed values at the mesh points.
    pub fn point_values(&self) -> ArrayView1<T> {
        self.point_values.view()
    }

    /// Returns a view of the values at the face centres.
    pub fn face_values(&self) -> ArrayView1<T> {
        self.face_values.view()
    }

    fn average_face_point_values(field: &CellField<F, T>, point_values: &Array1<T>) -> Array1<T> {
        let mesh = field.mesh();
        (0..mesh.n_faces())
            .map(|face| {
                let face_points = mesh.face_points(face);
                let weight = F::one() / F::from_usize(face_points.len()).unwrap_or_else(F::one);
                face_points
                    .iter()
                    .fold(T::zero(), |sum, &point| sum + point_values[point] * weight)
            })
            .collect()
    }
}

impl<'a, F, T> PointInterpolation<F, T> for CellPointInterpolation<'a, F, T>
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

    fn locator(&self) -> &TetLocator<'_, F> {
        &self.locator
    }

    fn tet_vertex_values(&self, tet: &TetIndices) -> [T; 4] {
        let (first_point, second_point) = self.field.mesh().tet_face_points(tet);
        [
            self.field.value(tet.cell()),
            self.face_values[tet.face()],
            self.point_values[first_point],
            self.point_values[second_point],
        ]
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        error::InterpolationError,
        geometry::{Dim3, Point3, Vec3},
        interpolation::{batch::FieldInterpolation, Interpolation},
        mesh::PolyMesh,
    };
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn block(n: usize) -> Arc<PolyMesh<f64>> {
        Arc::new(
            PolyMesh::hex_block(
                [n, n, n],
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(n as f64, n as f64, n as f64),
            )
            .unwrap(),
        )
    }

    fn linear(position: &Point3<f64>) -> f64 {
        3.0 * position[Dim3::X] - position[Dim3::Y] + 0.5 * position[Dim3::Z] + 1.0
    }

    #[test]
    fn cell_point_gives_cell_value_at_cell_centre() {
        let field =
            CellField::from_cell_centres("f".to_string(), block(3), |c| linear(c).powi(2));
        let interpolation =
            FieldInterpolation::new(CellPointInterpolation::new(&field, &LocatorConfig::default()));
        for (cell, centre) in field.mesh().cell_centres().iter().enumerate() {
            assert_abs_diff_eq!(
                interpolation.interpolate(centre, cell, None).unwrap(),
                field.value(cell),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn cell_point_preserves_uniform_vector_field() {
        let value = Vec3::new(1.5, -2.0, 0.25);
        let field = CellField::uniform("U".to_string(), block(2), value);
        let interpolation =
            FieldInterpolation::new(CellPointInterpolation::new(&field, &LocatorConfig::default()));
        let positions = [
            Point3::new(0.1, 0.1, 0.1),
            Point3::new(0.5, 0.9, 0.3),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.7, 0.2, 1.9),
        ];
        let cells = [0, 0, 0, 5];
        for (position, &cell) in positions.iter().zip(&cells) {
            assert_abs_diff_eq!(
                interpolation.interpolate(position, cell, None).unwrap(),
                value,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn cell_point_is_exact_for_linear_field_in_interior_cell() {
        let field = CellField::from_cell_centres("f".to_string(), block(3), linear);
        let interpolation =
            FieldInterpolation::new(CellPointInterpolation::new(&field, &LocatorConfig::default()));
        // Cell 13 is the centre cell, all of whose points are interior
        let cell = 13;
        let positions = [
            Point3::new(1.1, 1.2, 1.3),
            Point3::new(1.9, 1.5, 1.05),
            Point3::new(1.5, 1.5, 1.5),
            Point3::new(1.0, 2.0, 1.0),
        ];
        for position in &positions {
            assert_abs_diff_eq!(
                interpolation.interpolate(position, cell, None).unwrap(),
                linear(position),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn cell_point_is_continuous_across_internal_faces() {
        let field = CellField::from_cell_centres("f".to_string(), block(2), |c| {
            (c[Dim3::X] * c[Dim3::Y]).sin() + c[Dim3::Z].powi(3)
        });
        let interpolation =
            FieldInterpolation::new(CellPointInterpolation::new(&field, &LocatorConfig::default()));
        let mesh = field.mesh();
        for face in 0..mesh.n_internal_faces() {
            let owner = mesh.owner(face);
            let neighbour = mesh.neighbour(face).unwrap();
            let face_points = mesh.face_points(face);
            // Point inside the face, off the diagonals of its triangulation
            let position = Point3::from_vec3(
                mesh.face_centres()[face].to_vec3() * 0.6
                    + mesh.points()[face_points[0]].to_vec3() * 0.3
                    + mesh.points()[face_points[1]].to_vec3() * 0.1,
            );
            let from_owner = interpolation.interpolate(&position, owner, None).unwrap();
            let from_neighbour = interpolation
                .interpolate(&position, neighbour, None)
                .unwrap();
            assert_abs_diff_eq!(from_owner, from_neighbour, epsilon = 1e-10);

            let hinted = interpolation
                .interpolate(&position, neighbour, Some(face))
                .unwrap();
            assert_abs_diff_eq!(hinted, from_owner, epsilon = 1e-10);
        }
    }

    #[test]
    fn precomputed_values_must_match_mesh() {
        let field = CellField::uniform("p".to_string(), block(1), 1.0);
        let mesh = field.mesh();
        assert!(CellPointInterpolation::with_values(
            &field,
            &LocatorConfig::default(),
            Array1::zeros(mesh.n_points()),
            Array1::zeros(mesh.n_faces()),
        )
        .is_ok());
        assert_eq!(
            CellPointInterpolation::with_values(
                &field,
                &LocatorConfig::default(),
                Array1::zeros(mesh.n_points() - 1),
                Array1::zeros(mesh.n_faces()),
            )
            .unwrap_err(),
            InterpolationError::SizeMismatch {
                what: "point values",
                expected: mesh.n_points(),
                actual: mesh.n_points() - 1
            }
        );
    }
}
