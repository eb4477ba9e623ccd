//! Construction of simple meshes.

use super::PolyMesh;
use crate::{
    error::{InterpResult, InterpolationError},
    geometry::{
        Dim3::{X, Y, Z},
        Point3,
    },
    num::BFloat,
};
use ndarray::prelude::*;

impl<F: BFloat> PolyMesh<F> {
    /// Creates a mesh of a box subdivided into a regular block of hexahedral cells.
    ///
    /// # Parameters
    ///
    /// - `shape`: Number of cells along the x-, y- and z-direction.
    /// - `lower`: Lower corner of the box.
    /// - `upper`: Upper corner of the box.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the new mesh, with cell `i + nx*(j + ny*k)` at index `(i, j, k)`.
    /// - `Err`: Contains an `InvalidMesh` error if the shape has a zero dimension.
    pub fn hex_block(shape: [usize; 3], lower: Point3<F>, upper: Point3<F>) -> InterpResult<Self> {
        let [nx, ny, nz] = shape;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(InterpolationError::InvalidMesh(format!(
                "Invalid block shape {}x{}x{}",
                nx, ny, nz
            )));
        }

        let xs = Array1::linspace(lower[X], upper[X], nx + 1);
        let ys = Array1::linspace(lower[Y], upper[Y], ny + 1);
        let zs = Array1::linspace(lower[Z], upper[Z], nz + 1);

        let point_idx = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + (ny + 1) * k);
        let cell_idx = |i: usize, j: usize, k: usize| i + nx * (j + ny * k);

        let mut points = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    points.push(Point3::new(xs[i], ys[j], zs[k]));
                }
            }
        }

        // Points of the faces with normals along +x, +y and +z
        let x_face = |i, j, k| {
            vec![
                point_idx(i, j, k),
                point_idx(i, j + 1, k),
                point_idx(i, j + 1, k + 1),
                point_idx(i, j, k + 1),
            ]
        };
        let y_face = |i, j, k| {
            vec![
                point_idx(i, j, k),
                point_idx(i, j, k + 1),
                point_idx(i + 1, j, k + 1),
                point_idx(i + 1, j, k),
            ]
        };
        let z_face = |i, j, k| {
            vec![
                point_idx(i, j, k),
                point_idx(i + 1, j, k),
                point_idx(i + 1, j + 1, k),
                point_idx(i, j + 1, k),
            ]
        };
        let reversed = |mut face: Vec<usize>| {
            face.reverse();
            face
        };

        let mut faces = Vec::new();
        let mut owner = Vec::new();
        let mut neighbour = Vec::new();

        for k in 0..nz {
            for j in 0..ny {
                for i in 1..nx {
                    faces.push(x_face(i, j, k));
                    owner.push(cell_idx(i - 1, j, k));
                    neighbour.push(cell_idx(i, j, k));
                }
            }
        }
        for k in 0..nz {
            for j in 1..ny {
                for i in 0..nx {
                    faces.push(y_face(i, j, k));
                    owner.push(cell_idx(i, j - 1, k));
                    neighbour.push(cell_idx(i, j, k));
                }
            }
        }
        for k in 1..nz {
            for j in 0..ny {
                for i in 0..nx {
                    faces.push(z_face(i, j, k));
                    owner.push(cell_idx(i, j, k - 1));
                    neighbour.push(cell_idx(i, j, k));
                }
            }
        }

        for k in 0..nz {
            for j in 0..ny {
                faces.push(reversed(x_face(0, j, k)));
                owner.push(cell_idx(0, j, k));
                faces.push(x_face(nx, j, k));
                owner.push(cell_idx(nx - 1, j, k));
            }
        }
        for k in 0..nz {
            for i in 0..nx {
                faces.push(reversed(y_face(i, 0, k)));
                owner.push(cell_idx(i, 0, k));
                faces.push(y_face(i, ny, k));
                owner.push(cell_idx(i, ny - 1, k));
            }
        }
        for j in 0..ny {
            for i in 0..nx {
                faces.push(reversed(z_face(i, j, 0)));
                owner.push(cell_idx(i, j, 0));
                faces.push(z_face(i, j, nz));
                owner.push(cell_idx(i, j, nz - 1));
            }
        }

        Self::new(points, faces, owner, neighbour)
    }

    /// Creates a mesh consisting of a single tetrahedral cell with the given vertices.
    pub fn single_tetrahedron(vertices: [Point3<F>; 4]) -> InterpResult<Self> {
        let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]];
        Self::new(vertices.to_vec(), faces, vec![0; 4], Vec::new())
    }
}
