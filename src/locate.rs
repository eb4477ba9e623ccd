//! Locating points within the tetrahedral decomposition of mesh cells.

use crate::{
    error::{check_index, IndexKind, InterpResult, InterpolationError},
    geometry::{Barycentric, Point3},
    mesh::PolyMesh,
    num::BFloat,
};
use std::{fmt, str::FromStr};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Identifies one tetrahedron in the decomposition of a cell.
///
/// The tetrahedron is spanned by the cell centre, the centre of the face and
/// face points `tet_point` and `tet_point + 1` (wrapping around the face).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct TetIndices {
    cell: usize,
    face: usize,
    tet_point: usize,
}

impl TetIndices {
    pub fn new(cell: usize, face: usize, tet_point: usize) -> Self {
        Self {
            cell,
            face,
            tet_point,
        }
    }

    pub fn cell(&self) -> usize {
        self.cell
    }

    pub fn face(&self) -> usize {
        self.face
    }

    pub fn tet_point(&self) -> usize {
        self.tet_point
    }

    /// Returns an error unless the indices refer to a tetrahedron of the given mesh.
    pub fn validate<F: BFloat>(&self, mesh: &PolyMesh<F>) -> InterpResult<()> {
        mesh.check_cell_face(self.cell, self.face)?;
        check_index(
            IndexKind::TetPoint,
            self.tet_point,
            mesh.face_points(self.face).len(),
        )
    }
}

/// How to treat points lying outside every tetrahedron of the queried cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutsidePolicy {
    /// Use the coordinates with respect to the best-fitting tetrahedron as they are,
    /// extrapolating linearly.
    Extrapolate,
    /// Move the point onto the surface of the best-fitting tetrahedron.
    Clamp,
    /// Fail with a `PointOutsideCell` error.
    Reject,
}

impl fmt::Display for OutsidePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Extrapolate => "extrapolate",
                Self::Clamp => "clamp",
                Self::Reject => "reject",
            }
        )
    }
}

impl FromStr for OutsidePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extrapolate" => Ok(Self::Extrapolate),
            "clamp" => Ok(Self::Clamp),
            "reject" => Ok(Self::Reject),
            _ => Err(format!(
                "Invalid outside policy `{}`, valid policies are extrapolate, clamp and reject",
                s
            )),
        }
    }
}

/// Configuration parameters for tetrahedron locators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocatorConfig<F> {
    /// How to treat points lying outside the queried cell.
    pub outside_policy: OutsidePolicy,
    /// How negative a barycentric coordinate may be before the point counts as outside.
    pub tolerance: F,
    /// Tetrahedra with six times their volume below this fraction of the cube of
    /// their longest edge are ignored.
    pub degeneracy_tolerance: F,
}

impl<F: BFloat> LocatorConfig<F> {
    pub const DEFAULT_OUTSIDE_POLICY: OutsidePolicy = OutsidePolicy::Extrapolate;
    pub const DEFAULT_TOLERANCE: f64 = 1e-8;
    pub const DEFAULT_DEGENERACY_TOLERANCE: f64 = 1e-12;
}

impl<F: BFloat> Default for LocatorConfig<F> {
    fn default() -> Self {
        LocatorConfig {
            outside_policy: Self::DEFAULT_OUTSIDE_POLICY,
            tolerance: F::from_f64(Self::DEFAULT_TOLERANCE).unwrap(),
            degeneracy_tolerance: F::from_f64(Self::DEFAULT_DEGENERACY_TOLERANCE).unwrap(),
        }
    }
}

/// Finds the tetrahedron of a cell containing a point, together with the
/// barycentric coordinates of the point within it.
#[derive(Clone, Debug)]
pub struct TetLocator<'a, F: BFloat> {
    mesh: &'a PolyMesh<F>,
    config: LocatorConfig<F>,
}

impl<'a, F: BFloat> TetLocator<'a, F> {
    /// Creates a new locator for the given mesh.
    pub fn new(mesh: &'a PolyMesh<F>, config: LocatorConfig<F>) -> Self {
        Self { mesh, config }
    }

    /// Returns a reference to the mesh.
    pub fn mesh(&self) -> &'a PolyMesh<F> {
        self.mesh
    }

    /// Returns a reference to the configuration parameters.
    pub fn config(&self) -> &LocatorConfig<F> {
        &self.config
    }

    /// Locates the given position within the tetrahedral decomposition of the given cell.
    ///
    /// # Parameters
    ///
    /// - `cell`: Index of the cell to search.
    /// - `position`: Position to locate. It may lie slightly outside the cell.
    /// - `face_hint`: Face of the cell that the position is known to lie on or
    /// close to. Only tetrahedra on this face are considered when given.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the indices of the tetrahedron whose smallest barycentric
    /// coordinate is largest, with the coordinates of the position in it
    /// (adjusted according to the outside policy).
    /// - `Err`: Contains an `InvalidIndex` or `FaceNotOnCell` error for invalid
    /// indices, a `DegenerateGeometry` error if all candidates are degenerate, or
    /// a `PointOutsideCell` error if the point is outside and outside points are rejected.
    pub fn locate(
        &self,
        cell: usize,
        position: &Point3<F>,
        face_hint: Option<usize>,
    ) -> InterpResult<(TetIndices, Barycentric<F>)> {
        self.mesh.check_cell(cell)?;

        let best = match face_hint {
            Some(face) => {
                self.mesh.check_cell_face(cell, face)?;
                self.find_best_tet(self.mesh.face_tets(cell, face), position)
            }
            None => self.find_best_tet(self.mesh.cell_tets(cell), position),
        };

        let (tet, coordinates) = best.ok_or(InterpolationError::DegenerateGeometry { cell })?;
        Ok((tet, self.apply_outside_policy(cell, coordinates)?))
    }

    /// Computes the barycentric coordinates of the given position with respect
    /// to the tetrahedron with the given indices.
    pub fn barycentric_in(
        &self,
        tet: &TetIndices,
        position: &Point3<F>,
    ) -> InterpResult<Barycentric<F>> {
        tet.validate(self.mesh)?;
        let tetrahedron = self.mesh.tet(tet);
        if tetrahedron.is_degenerate(self.config.degeneracy_tolerance) {
            return Err(InterpolationError::DegenerateGeometry { cell: tet.cell() });
        }
        Ok(tetrahedron.barycentric_coordinates(position))
    }

    /// Finds the cell containing the given position by walking through the
    /// mesh from the given start cell.
    ///
    /// Each step moves across the face of the current cell that the position
    /// lies farthest outside of. The walk stops at the first cell whose best
    /// tetrahedron contains the position within the tolerance. If the walk
    /// leaves the mesh or fails to arrive, the visited cell that came closest
    /// to containing the position is returned.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the index of the host cell.
    /// - `Err`: Contains an `InvalidIndex` error if the start cell does not exist.
    pub fn find_containing_cell(
        &self,
        start_cell: usize,
        position: &Point3<F>,
    ) -> InterpResult<usize> {
        self.mesh.check_cell(start_cell)?;

        let mut cell = start_cell;
        let mut closest: Option<(usize, F)> = None;

        for _ in 0..self.mesh.n_cells() {
            if let Some((_, coordinates)) = self.find_best_tet(self.mesh.cell_tets(cell), position)
            {
                if coordinates.is_inside(self.config.tolerance) {
                    return Ok(cell);
                }
                let min_coordinate = coordinates.min();
                if closest.map_or(true, |(_, closest_min)| min_coordinate > closest_min) {
                    closest = Some((cell, min_coordinate));
                }
            }
            match self.next_cell_towards(cell, position) {
                Some(next_cell) => cell = next_cell,
                None => break,
            }
        }
        Ok(closest.map_or(cell, |(closest_cell, _)| closest_cell))
    }

    /// Returns the cell across the face of the given cell that the position
    /// lies farthest outside of, or `None` if the position is inside all the
    /// face planes or the face is on the boundary.
    fn next_cell_towards(&self, cell: usize, position: &Point3<F>) -> Option<usize> {
        let mesh = self.mesh;
        mesh.cell_faces(cell)
            .iter()
            .filter_map(|&face| {
                let area = mesh.face_areas()[face];
                let area_magnitude = area.length();
                if area_magnitude <= F::zero() {
                    return None;
                }
                let outward_area = if mesh.owner(face) == cell { area } else { -area };
                let distance =
                    outward_area.dot(&(*position - mesh.face_centres()[face])) / area_magnitude;
                Some((face, distance))
            })
            .fold(None, |farthest: Option<(usize, F)>, (face, distance)| match farthest {
                Some((_, farthest_distance)) if farthest_distance >= distance => farthest,
                _ => Some((face, distance)),
            })
            .filter(|&(_, distance)| distance > F::zero())
            .and_then(|(face, _)| {
                let owner = mesh.owner(face);
                if owner == cell {
                    mesh.neighbour(face)
                } else {
                    Some(owner)
                }
            })
    }

    fn find_best_tet<I>(
        &self,
        candidates: I,
        position: &Point3<F>,
    ) -> Option<(TetIndices, Barycentric<F>)>
    where
        I: Iterator<Item = TetIndices>,
    {
        candidates
            .filter_map(|tet| {
                let tetrahedron = self.mesh.tet(&tet);
                if tetrahedron.is_degenerate(self.config.degeneracy_tolerance) {
                    None
                } else {
                    Some((tet, tetrahedron.barycentric_coordinates(position)))
                }
            })
            .fold(None, |best: Option<(TetIndices, Barycentric<F>)>, candidate| match best {
                Some((_, best_coordinates)) if best_coordinates.min() >= candidate.1.min() => best,
                _ => Some(candidate),
            })
    }

    fn apply_outside_policy(
        &self,
        cell: usize,
        coordinates: Barycentric<F>,
    ) -> InterpResult<Barycentric<F>> {
        if coordinates.is_inside(self.config.tolerance) {
            return Ok(coordinates);
        }
        match self.config.outside_policy {
            OutsidePolicy::Extrapolate => Ok(coordinates),
            OutsidePolicy::Clamp => Ok(coordinates.clamped()),
            OutsidePolicy::Reject => Err(InterpolationError::PointOutsideCell {
                cell,
                min_coordinate: coordinates.min().to_f64().unwrap_or(f64::NAN),
            }),
        }
    }
}
