//! Fields of values stored at the centres of mesh cells.

use crate::{
    error::{check_length, InterpResult},
    geometry::Point3,
    mesh::PolyMesh,
    num::{BFloat, FieldValue},
};
use ndarray::prelude::*;
use std::sync::Arc;

/// A field with one value of type `T` per mesh cell.
#[derive(Clone, Debug)]
pub struct CellField<F: BFloat, T: FieldValue<F>> {
    name: String,
    mesh: Arc<PolyMesh<F>>,
    values: Array1<T>,
}

impl<F, T> CellField<F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    /// Creates a new cell field from the given values.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the new field.
    /// - `Err`: Contains a `SizeMismatch` error if the number of values
    /// differs from the number of cells in the mesh.
    pub fn new(name: String, mesh: Arc<PolyMesh<F>>, values: Array1<T>) -> InterpResult<Self> {
        check_length("field values", mesh.n_cells(), values.len())?;
        Ok(Self {
            name,
            mesh,
            values,
        })
    }

    /// Creates a new cell field with the same value in every cell.
    pub fn uniform(name: String, mesh: Arc<PolyMesh<F>>, value: T) -> Self {
        let values = Array1::from_elem(mesh.n_cells(), value);
        Self {
            name,
            mesh,
            values,
        }
    }

    /// Creates a new cell field by evaluating the given function at each cell centre.
    pub fn from_cell_centres<C>(name: String, mesh: Arc<PolyMesh<F>>, compute_value: C) -> Self
    where
        C: Fn(&Point3<F>) -> T,
    {
        let values = mesh.cell_centres().iter().map(compute_value).collect();
        Self {
            name,
            mesh,
            values,
        }
    }

    /// Returns the name of the field.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns a reference to the mesh.
    pub fn mesh(&self) -> &PolyMesh<F> {
        self.mesh.as_ref()
    }

    /// Returns a new atomic reference counted pointer to the mesh.
    pub fn arc_with_mesh(&self) -> Arc<PolyMesh<F>> {
        Arc::clone(&self.mesh)
    }

    /// Returns a view of the cell values.
    pub fn values(&self) -> ArrayView1<T> {
        self.values.view()
    }

    /// Returns the value in the given cell.
    ///
    /// # Panics
    ///
    /// If the cell index is out of bounds.
    pub fn value(&self, cell: usize) -> T {
        self.values[cell]
    }

    /// Returns a mutable view of the cell values.
    ///
    /// Interpolators borrow the field, so values can only be modified while
    /// no interpolator is bound to it.
    pub fn values_mut(&mut self) -> ArrayViewMut1<T> {
        self.values.view_mut()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{error::InterpolationError, geometry::Dim3};

    fn mesh() -> Arc<PolyMesh<f64>> {
        Arc::new(
            PolyMesh::hex_block(
                [3, 1, 1],
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3.0, 1.0, 1.0),
            )
            .unwrap(),
        )
    }

    #[test]
    fn field_value_count_must_match_cell_count() {
        assert_eq!(
            CellField::new("p".to_string(), mesh(), array![1.0, 2.0]).unwrap_err(),
            InterpolationError::SizeMismatch {
                what: "field values",
                expected: 3,
                actual: 2
            }
        );
        assert!(CellField::new("p".to_string(), mesh(), array![1.0, 2.0, 3.0]).is_ok());
    }

    #[test]
    fn field_from_cell_centres_works() {
        let field = CellField::from_cell_centres("x".to_string(), mesh(), |centre| centre[Dim3::X]);
        assert_eq!(field.values().to_vec(), vec![0.5, 1.5, 2.5]);
        assert_eq!(field.value(2), 2.5);
        assert_eq!(field.name(), "x");
    }
}
