//! Mapping of interpolated field values onto arbitrary sets of points.

use crate::{
    error::{InterpResult, InterpolationError},
    geometry::Point3,
    interpolation::Interpolation,
    io::Verbosity,
    locate::{LocatorConfig, TetLocator},
    mesh::PolyMesh,
    num::{BFloat, FieldValue},
};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

/// Finds the cell hosting each of the given points.
///
/// The search for each point starts in the cell with the nearest centre and
/// walks through the mesh until it reaches the cell containing the point. Points
/// outside the mesh are assigned the boundary cell closest to containing them.
pub fn find_host_cells<F: BFloat>(
    mesh: &PolyMesh<F>,
    points: &[Point3<F>],
    verbosity: &Verbosity,
) -> InterpResult<Vec<usize>> {
    if mesh.n_cells() == 0 {
        return Err(InterpolationError::InvalidMesh(
            "Cannot find host cells in a mesh without cells".to_string(),
        ));
    }
    let locator = TetLocator::new(mesh, LocatorConfig::default());
    points
        .par_iter()
        .progress_with(verbosity.create_progress_bar(points.len()))
        .map(|point| {
            let start_cell = mesh.find_nearest_cell(point).unwrap_or(0);
            locator.find_containing_cell(start_cell, point)
        })
        .collect()
}

/// Computes interpolated values of a field at the given points.
///
/// # Parameters
///
/// - `interpolation`: Scheme bound to the field to map.
/// - `points`: Points where the field should be evaluated.
/// - `verbosity`: Whether and how to report progress.
///
/// # Returns
///
/// A `InterpResult` which is either:
///
/// - `Ok`: Contains the interpolated value at each point, in the same order.
/// - `Err`: Contains the error for the first point that could not be evaluated.
pub fn map_to_points<F, T, I>(
    interpolation: &I,
    points: &[Point3<F>],
    verbosity: &Verbosity,
) -> InterpResult<Vec<T>>
where
    F: BFloat,
    T: FieldValue<F>,
    I: Interpolation<F, T> + ?Sized,
{
    let field = interpolation.field();
    if verbosity.print_messages() {
        println!(
            "Mapping {} to {} points using {} interpolation",
            field.name(),
            points.len(),
            interpolation.scheme_name()
        );
    }
    let cells = find_host_cells(field.mesh(), points, verbosity)?;
    interpolation.interpolate_batch(points, &cells, None)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        field::CellField,
        geometry::{Dim3, Vec3},
        interpolation::registry::{create_scheme, create_scheme_with_config},
        locate::OutsidePolicy,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;
    use std::sync::Arc;

    fn mesh() -> Arc<PolyMesh<f64>> {
        Arc::new(
            PolyMesh::hex_block(
                [3, 3, 3],
                Point3::new(-1.5, -1.5, -1.5),
                Point3::new(1.5, 1.5, 1.5),
            )
            .unwrap(),
        )
    }

    #[test]
    fn host_cells_in_regular_block_are_found() {
        let mesh = mesh();
        let points = [
            Point3::new(-1.2, -1.4, -1.0),
            Point3::new(0.1, 0.2, -0.3),
            Point3::new(1.4, 1.4, 1.4),
        ];
        assert_eq!(
            find_host_cells(&mesh, &points, &Verbosity::Quiet).unwrap(),
            vec![0, 13, 26]
        );
    }

    #[test]
    fn host_cells_contain_points_closer_to_other_centres() {
        let mesh = Arc::new(
            PolyMesh::new(
                vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                    Point3::new(0.0, 0.0, 1.0),
                    Point3::new(1.0, 1.0, 1.0),
                ],
                vec![
                    vec![1, 2, 3],
                    vec![0, 2, 1],
                    vec![0, 1, 3],
                    vec![0, 3, 2],
                    vec![1, 2, 4],
                    vec![1, 4, 3],
                    vec![2, 3, 4],
                ],
                vec![0, 0, 0, 0, 1, 1, 1],
                vec![1],
            )
            .unwrap(),
        );
        // Nearer to the centre of cell 0, but beyond the shared face x + y + z = 1
        let point = Point3::new(0.34, 0.34, 0.34);
        assert_eq!(mesh.find_nearest_cell(&point), Some(0));
        assert_eq!(
            find_host_cells(&mesh, &[point], &Verbosity::Quiet).unwrap(),
            vec![1]
        );

        let field =
            CellField::new("f".to_string(), Arc::clone(&mesh), arr1(&[1.0, 5.0])).unwrap();
        let cell = create_scheme("cell", &field).unwrap();
        assert_eq!(
            map_to_points(cell.as_ref(), &[point], &Verbosity::Quiet).unwrap(),
            vec![5.0]
        );

        let rejecting = LocatorConfig {
            outside_policy: OutsidePolicy::Reject,
            ..LocatorConfig::default()
        };
        let cell_point = create_scheme_with_config("cell_point", &field, &rejecting).unwrap();
        let mapped = map_to_points(cell_point.as_ref(), &[point], &Verbosity::Quiet).unwrap();
        assert_abs_diff_eq!(
            mapped[0],
            cell_point.interpolate(&point, 1, None).unwrap(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn mapping_reproduces_linear_field_in_interior() {
        let field = CellField::from_cell_centres("f".to_string(), mesh(), |c| {
            c[Dim3::X] + 2.0 * c[Dim3::Y] - 3.0 * c[Dim3::Z]
        });
        let interpolation = create_scheme("cell_point", &field).unwrap();
        let points: Vec<_> = (0..50)
            .map(|idx| {
                let t = idx as f64 / 49.0;
                Point3::new(0.45 * (2.0 * t - 1.0), 0.3 * t, -0.2 * t)
            })
            .collect();
        let values = map_to_points(interpolation.as_ref(), &points, &Verbosity::Quiet).unwrap();
        for (point, value) in points.iter().zip(values) {
            assert_abs_diff_eq!(
                value,
                point[Dim3::X] + 2.0 * point[Dim3::Y] - 3.0 * point[Dim3::Z],
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn mapping_uniform_vector_field_gives_uniform_values() {
        let value = Vec3::new(0.0, -1.0, 4.0);
        let field = CellField::uniform("U".to_string(), mesh(), value);
        let interpolation = create_scheme("cell_point_face", &field).unwrap();
        let points = vec![Point3::new(1.0, -0.7, 0.2); 10];
        for mapped in map_to_points(interpolation.as_ref(), &points, &Verbosity::Quiet).unwrap() {
            assert_abs_diff_eq!(mapped, value, epsilon = 1e-12);
        }
    }
}
