#![allow(dead_code)]

use cellterp::{
    field::CellField,
    geometry::{Dim3, Point3},
    mesh::PolyMesh,
};
use std::sync::Arc;

pub const SCHEME_NAMES: [&str; 3] = ["cell", "cell_point", "cell_point_face"];

#[macro_export]
macro_rules! def_scheme_test {
    (fn $name:ident($scheme_name:ident) $test_body:block) => {
        paste::paste! {
            #[test]
            fn [<$name _with_cell>]() {
                let $scheme_name: &str = "cell";
                $test_body
            }

            #[test]
            fn [<$name _with_cell_point>]() {
                let $scheme_name: &str = "cell_point";
                $test_body
            }

            #[test]
            fn [<$name _with_cell_point_face>]() {
                let $scheme_name: &str = "cell_point_face";
                $test_body
            }
        }
    };
}

pub fn assert_close(value: f64, expected: f64, epsilon: f64) {
    assert!(
        (value - expected).abs() <= epsilon,
        "Value {} differs from expected {} by more than {}",
        value,
        expected,
        epsilon
    );
}

pub fn assert_all_close<I>(values: I, expected: &[f64], epsilon: f64)
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<_> = values.into_iter().collect();
    assert_eq!(values.len(), expected.len());
    for (&value, &expected) in values.iter().zip(expected) {
        assert_close(value, expected, epsilon);
    }
}

/// Regular block of unit cubes with the lower corner at the origin.
pub fn unit_block(shape: [usize; 3]) -> Arc<PolyMesh<f64>> {
    Arc::new(
        PolyMesh::hex_block(
            shape,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(shape[0] as f64, shape[1] as f64, shape[2] as f64),
        )
        .unwrap(),
    )
}

/// Two tetrahedral cells sharing the face spanned by points 1, 2 and 3.
pub fn two_tet_mesh() -> Arc<PolyMesh<f64>> {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
    ];
    let faces = vec![
        vec![1, 2, 3],
        vec![0, 2, 1],
        vec![0, 1, 3],
        vec![0, 3, 2],
        vec![1, 2, 4],
        vec![1, 4, 3],
        vec![2, 3, 4],
    ];
    let owner = vec![0, 0, 0, 0, 1, 1, 1];
    let neighbour = vec![1];
    Arc::new(PolyMesh::new(points, faces, owner, neighbour).unwrap())
}

/// Smooth but nonlinear test function.
pub fn wavy(position: &Point3<f64>) -> f64 {
    (0.7 * position[Dim3::X]).sin() * (1.3 * position[Dim3::Y]).cos() + position[Dim3::Z].powi(2)
}

pub fn wavy_field(mesh: Arc<PolyMesh<f64>>) -> CellField<f64, f64> {
    CellField::from_cell_centres("wavy".to_string(), mesh, wavy)
}

/// Deterministic pseudo-random positions inside the given cells of a unit
/// block, paired with the cell indices.
pub fn positions_in_unit_block(
    mesh: &PolyMesh<f64>,
    n_positions: usize,
) -> (Vec<Point3<f64>>, Vec<usize>) {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next_fraction = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        // Stay clear of the cell boundaries
        0.02 + 0.96 * ((state >> 11) as f64 / (1u64 << 53) as f64)
    };
    (0..n_positions)
        .map(|idx| {
            let cell = idx % mesh.n_cells();
            let centre = mesh.cell_centres()[cell];
            let position = Point3::new(
                centre[Dim3::X] - 0.5 + next_fraction(),
                centre[Dim3::Y] - 0.5 + next_fraction(),
                centre[Dim3::Z] - 0.5 + next_fraction(),
            );
            (position, cell)
        })
        .unzip()
}
