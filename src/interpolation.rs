//! Interpolation of cell fields to arbitrary positions.

pub mod batch;
pub mod cell;
pub mod cell_point;
pub mod cell_point_face;
pub mod registry;
pub mod selection;

use crate::{
    error::InterpResult,
    field::CellField,
    geometry::{Barycentric, Point3},
    locate::{TetIndices, TetLocator},
    num::{BFloat, FieldValue},
};

/// Defines the properties of an interpolation scheme bound to a cell field.
///
/// Every method is a read-only query, so a scheme can be shared freely
/// between threads.
pub trait Interpolation<F: BFloat, T: FieldValue<F>>: Sync + Send {
    /// Returns the name the scheme is registered under.
    fn scheme_name(&self) -> &'static str;

    /// Returns a reference to the field being interpolated.
    fn field(&self) -> &CellField<F, T>;

    /// Computes the interpolated value of the field at the given position.
    ///
    /// # Parameters
    ///
    /// - `position`: Position where the interpolated value should be computed.
    /// - `cell`: Index of the cell containing the position.
    /// - `face`: Face of the cell that the position lies on, if known.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the interpolated field value.
    /// - `Err`: Contains the reason the position could not be resolved.
    fn interpolate(&self, position: &Point3<F>, cell: usize, face: Option<usize>)
        -> InterpResult<T>;

    /// Computes interpolated values at many positions.
    ///
    /// Element `i` of the result is identical to what `interpolate` returns
    /// for element `i` of the inputs. All inputs must have the same length,
    /// otherwise a `SizeMismatch` error is returned without evaluating anything.
    fn interpolate_batch(
        &self,
        positions: &[Point3<F>],
        cells: &[usize],
        faces: Option<&[Option<usize>]>,
    ) -> InterpResult<Vec<T>>;

    /// Computes the interpolated value of the field at the given barycentric
    /// coordinates within the tetrahedron with the given indices.
    fn interpolate_tet(
        &self,
        coordinates: &Barycentric<F>,
        tet: &TetIndices,
        face: Option<usize>,
    ) -> InterpResult<T>;

    /// Computes interpolated values at many barycentric coordinates.
    ///
    /// Element `i` of the result is identical to what `interpolate_tet` returns
    /// for the tetrahedron `(cells[i], tet_faces[i], tet_points[i])`.
    fn interpolate_tet_batch(
        &self,
        coordinates: &[Barycentric<F>],
        cells: &[usize],
        tet_faces: &[usize],
        tet_points: &[usize],
        faces: Option<&[Option<usize>]>,
    ) -> InterpResult<Vec<T>>;
}

/// Defines the single-point primitives of an interpolation scheme.
///
/// Wrapping an implementor in a `batch::FieldInterpolation` gives a full
/// `Interpolation` with batch evaluation.
pub trait PointInterpolation<F: BFloat, T: FieldValue<F>>: Sync + Send {
    /// Returns the name the scheme is registered under.
    fn scheme_name(&self) -> &'static str;

    /// Returns a reference to the field being interpolated.
    fn field(&self) -> &CellField<F, T>;

    /// Returns a reference to the locator used to resolve positions.
    fn locator(&self) -> &TetLocator<'_, F>;

    /// Returns the field values at the four vertices of the given tetrahedron,
    /// in the order cell centre, face centre, first and second face point.
    ///
    /// The indices are assumed to be valid.
    fn tet_vertex_values(&self, tet: &TetIndices) -> [T; 4];

    /// Computes the interpolated value at the given barycentric coordinates
    /// as the weighted sum of the tetrahedron vertex values.
    ///
    /// A given face must be one of the faces of the tetrahedron's cell.
    fn interpolate_tet(
        &self,
        coordinates: &Barycentric<F>,
        tet: &TetIndices,
        face: Option<usize>,
    ) -> InterpResult<T> {
        let mesh = self.field().mesh();
        tet.validate(mesh)?;
        if let Some(face) = face {
            mesh.check_cell_face(tet.cell(), face)?;
        }
        Ok(T::barycentric_sum(
            &self.tet_vertex_values(tet),
            coordinates,
        ))
    }

    /// Computes the interpolated value at the given position by locating it
    /// within the cell and evaluating at the resulting barycentric coordinates.
    fn interpolate(
        &self,
        position: &Point3<F>,
        cell: usize,
        face: Option<usize>,
    ) -> InterpResult<T> {
        let (tet, coordinates) = self.locator().locate(cell, position, face)?;
        self.interpolate_tet(&coordinates, &tet, face)
    }
}

#[cfg(test)]
mod tests {

    use super::{
        batch::FieldInterpolation, cell::CellInterpolation, cell_point::CellPointInterpolation, *,
    };
    use crate::{
        error::{IndexKind, InterpolationError},
        locate::LocatorConfig,
        mesh::PolyMesh,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;
    use std::sync::Arc;

    fn unit_tetrahedron() -> Arc<PolyMesh<f64>> {
        Arc::new(
            PolyMesh::single_tetrahedron([
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ])
            .unwrap(),
        )
    }

    /// Scheme with fixed tetrahedron vertex values.
    struct FixedVertexValues<'a> {
        field: &'a CellField<f64, f64>,
        locator: TetLocator<'a, f64>,
        vertex_values: [f64; 4],
    }

    impl<'a> PointInterpolation<f64, f64> for FixedVertexValues<'a> {
        fn scheme_name(&self) -> &'static str {
            "fixed"
        }
        fn field(&self) -> &CellField<f64, f64> {
            self.field
        }
        fn locator(&self) -> &TetLocator<'_, f64> {
            &self.locator
        }
        fn tet_vertex_values(&self, _tet: &TetIndices) -> [f64; 4] {
            self.vertex_values
        }
    }

    #[test]
    fn tet_centroid_gives_mean_of_vertex_values() {
        let field = CellField::uniform("f".to_string(), unit_tetrahedron(), 10.0);
        let interpolation = FieldInterpolation::new(FixedVertexValues {
            field: &field,
            locator: TetLocator::new(field.mesh(), LocatorConfig::default()),
            vertex_values: [8.0, 9.0, 11.0, 12.0],
        });
        let tet = field.mesh().cell_tets(0).next().unwrap();
        let value = interpolation
            .interpolate_tet(&Barycentric::centroid(), &tet, None)
            .unwrap();
        assert_abs_diff_eq!(value, 10.0, epsilon = 1e-12);
        assert_eq!(interpolation.scheme_name(), "fixed");
    }

    #[test]
    fn cell_point_tet_centroid_gives_mean_of_vertex_values() {
        let mesh = unit_tetrahedron();
        let field = CellField::uniform("f".to_string(), Arc::clone(&mesh), 8.0);
        let tet = mesh.cell_tets(0).next().unwrap();
        let (first_point, second_point) = mesh.tet_face_points(&tet);

        let mut point_values = Array1::zeros(mesh.n_points());
        point_values[first_point] = 11.0;
        point_values[second_point] = 12.0;
        let face_values = Array1::from_elem(mesh.n_faces(), 9.0);

        let interpolation = FieldInterpolation::new(
            CellPointInterpolation::with_values(
                &field,
                &LocatorConfig::default(),
                point_values,
                face_values,
            )
            .unwrap(),
        );
        let value = interpolation
            .interpolate_tet(&Barycentric::centroid(), &tet, None)
            .unwrap();
        assert_abs_diff_eq!(value, 10.0, epsilon = 1e-12);

        let values = interpolation
            .interpolate_tet_batch(
                &[Barycentric::centroid(), Barycentric::new(0.0, 0.0, 1.0, 0.0)],
                &[0, 0],
                &[tet.face(), tet.face()],
                &[tet.tet_point(), tet.tet_point()],
                None,
            )
            .unwrap();
        assert_abs_diff_eq!(values[0], 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(values[1], 11.0, epsilon = 1e-12);
    }

    #[test]
    fn tet_evaluation_validates_face_argument() {
        let mesh = unit_tetrahedron();
        let field = CellField::uniform("f".to_string(), Arc::clone(&mesh), 1.0);
        let tet = mesh.cell_tets(0).next().unwrap();
        let cell = CellInterpolation::new(&field);
        let cell_point = FieldInterpolation::new(CellPointInterpolation::new(
            &field,
            &LocatorConfig::default(),
        ));
        let schemes: [&dyn Interpolation<f64, f64>; 2] = [&cell, &cell_point];

        for scheme in schemes {
            assert_eq!(
                scheme.interpolate_tet(&Barycentric::centroid(), &tet, Some(usize::MAX)),
                Err(InterpolationError::InvalidIndex {
                    kind: IndexKind::Face,
                    index: usize::MAX,
                    len: mesh.n_faces()
                })
            );
            assert_eq!(
                scheme.interpolate_tet_batch(
                    &[Barycentric::centroid(); 2],
                    &[0, 0],
                    &[tet.face(), tet.face()],
                    &[tet.tet_point(), tet.tet_point()],
                    Some(&[Some(tet.face()), Some(999_999)][..]),
                ),
                Err(InterpolationError::InvalidIndex {
                    kind: IndexKind::Face,
                    index: 999_999,
                    len: mesh.n_faces()
                })
            );
            assert_abs_diff_eq!(
                scheme
                    .interpolate_tet(&Barycentric::centroid(), &tet, Some(tet.face()))
                    .unwrap(),
                1.0,
                epsilon = 1e-12
            );
        }
    }
}
