//! Reconstruction of cell field values at mesh points and face centres.

use crate::{
    field::CellField,
    num::{BFloat, FieldValue},
};
use ndarray::prelude::*;

/// Computes the value of the field at every mesh point as the inverse
/// distance weighted average of the values in the cells sharing the point.
pub fn reconstruct_point_values<F, T>(field: &CellField<F, T>) -> Array1<T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    let mesh = field.mesh();
    (0..mesh.n_points())
        .map(|point| {
            mesh.point_cells(point)
                .iter()
                .zip(mesh.point_cell_weights(point))
                .fold(T::zero(), |sum, (&cell, &weight)| {
                    sum + field.value(cell) * weight
                })
        })
        .collect()
}

/// Computes the value of the field at every face centre.
///
/// Internal faces get the linear interpolation between the owner and
/// neighbour values, weighted by the distances from the cell centres to the
/// face centre. Boundary faces get the owner value.
pub fn reconstruct_face_values<F, T>(field: &CellField<F, T>) -> Array1<T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    let mesh = field.mesh();
    let cell_centres = mesh.cell_centres();
    let face_centres = mesh.face_centres();
    (0..mesh.n_faces())
        .map(|face| {
            let owner = mesh.owner(face);
            match mesh.neighbour(face) {
                Some(neighbour) => {
                    let owner_distance = face_centres[face].distance_to(&cell_centres[owner]);
                    let neighbour_distance =
                        face_centres[face].distance_to(&cell_centres[neighbour]);
                    let total_distance = owner_distance + neighbour_distance;
                    if total_distance <= F::min_positive_value() {
                        return field.value(owner);
                    }
                    let owner_weight = neighbour_distance / total_distance;
                    field.value(owner) * owner_weight
                        + field.value(neighbour) * (F::one() - owner_weight)
                }
                None => field.value(owner),
            }
        })
        .collect()
}
