//! Unstructured meshes of polyhedral cells.

pub mod block;

use crate::{
    error::{check_index, IndexKind, InterpResult, InterpolationError},
    geometry::{Point3, Tetrahedron, Vec3},
    locate::TetIndices,
    num::BFloat,
};

/// A mesh of arbitrary polyhedral cells described by their faces.
///
/// Faces are ordered lists of point indices. Each face has an owner cell,
/// and internal faces (which come first) additionally have a neighbour cell.
/// Face area vectors point from the owner into the neighbour.
#[derive(Clone, Debug)]
pub struct PolyMesh<F: BFloat> {
    points: Vec<Point3<F>>,
    faces: Vec<Vec<usize>>,
    owner: Vec<usize>,
    neighbour: Vec<usize>,
    cell_faces: Vec<Vec<usize>>,
    point_cells: Vec<Vec<usize>>,
    point_cell_weights: Vec<Vec<F>>,
    face_centres: Vec<Point3<F>>,
    face_areas: Vec<Vec3<F>>,
    cell_centres: Vec<Point3<F>>,
    cell_volumes: Vec<F>,
}

impl<F: BFloat> PolyMesh<F> {
    /// Creates a new mesh from points, faces and face-cell connectivity,
    /// and computes the derived connectivity and geometry.
    ///
    /// # Parameters
    ///
    /// - `points`: Positions of the mesh points.
    /// - `faces`: Point indices of each face, in order around the face.
    /// - `owner`: Owner cell of each face.
    /// - `neighbour`: Neighbour cell of each internal face. Internal faces
    /// must be the first `neighbour.len()` faces.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the new mesh.
    /// - `Err`: Contains an `InvalidMesh` error describing the violated invariant.
    pub fn new(
        points: Vec<Point3<F>>,
        faces: Vec<Vec<usize>>,
        owner: Vec<usize>,
        neighbour: Vec<usize>,
    ) -> InterpResult<Self> {
        if owner.len() != faces.len() {
            return Err(InterpolationError::InvalidMesh(format!(
                "Got {} owner cells for {} faces",
                owner.len(),
                faces.len()
            )));
        }
        if neighbour.len() > faces.len() {
            return Err(InterpolationError::InvalidMesh(format!(
                "Got {} neighbour cells for {} faces",
                neighbour.len(),
                faces.len()
            )));
        }
        for (face_idx, face_points) in faces.iter().enumerate() {
            if face_points.len() < 3 {
                return Err(InterpolationError::InvalidMesh(format!(
                    "Face {} has only {} points",
                    face_idx,
                    face_points.len()
                )));
            }
            if let Some(&point_idx) = face_points.iter().find(|&&idx| idx >= points.len()) {
                return Err(InterpolationError::InvalidMesh(format!(
                    "Face {} refers to point {} but there are only {} points",
                    face_idx,
                    point_idx,
                    points.len()
                )));
            }
        }
        for (face_idx, (&own, &nei)) in owner.iter().zip(neighbour.iter()).enumerate() {
            if own == nei {
                return Err(InterpolationError::InvalidMesh(format!(
                    "Internal face {} has cell {} as both owner and neighbour",
                    face_idx, own
                )));
            }
        }

        let n_cells = owner
            .iter()
            .chain(neighbour.iter())
            .max()
            .map_or(0, |&max_cell| max_cell + 1);

        let mut cell_faces = vec![Vec::new(); n_cells];
        for (face_idx, &cell) in owner.iter().enumerate() {
            cell_faces[cell].push(face_idx);
        }
        for (face_idx, &cell) in neighbour.iter().enumerate() {
            cell_faces[cell].push(face_idx);
        }
        if let Some(cell) = cell_faces.iter().position(|faces| faces.len() < 4) {
            return Err(InterpolationError::InvalidMesh(format!(
                "Cell {} has only {} faces",
                cell,
                cell_faces[cell].len()
            )));
        }

        let (face_centres, face_areas): (Vec<_>, Vec<_>) = faces
            .iter()
            .map(|face_points| Self::compute_face_centre_and_area(&points, face_points))
            .unzip();

        let (cell_centres, cell_volumes): (Vec<_>, Vec<_>) = cell_faces
            .iter()
            .map(|faces| Self::compute_cell_centre_and_volume(faces, &face_centres, &face_areas))
            .unzip();

        let point_cells = Self::compute_point_cells(points.len(), &faces, &cell_faces);
        let point_cell_weights =
            Self::compute_point_cell_weights(&points, &point_cells, &cell_centres);

        Ok(Self {
            points,
            faces,
            owner,
            neighbour,
            cell_faces,
            point_cells,
            point_cell_weights,
            face_centres,
            face_areas,
            cell_centres,
            cell_volumes,
        })
    }

    /// Returns the number of cells.
    pub fn n_cells(&self) -> usize {
        self.cell_faces.len()
    }

    /// Returns the number of faces.
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Returns the number of internal faces.
    pub fn n_internal_faces(&self) -> usize {
        self.neighbour.len()
    }

    /// Returns the number of points.
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Returns a slice with the positions of all points.
    pub fn points(&self) -> &[Point3<F>] {
        &self.points
    }

    /// Returns the point indices of the given face.
    pub fn face_points(&self, face: usize) -> &[usize] {
        &self.faces[face]
    }

    /// Returns a slice with the centres of all faces.
    pub fn face_centres(&self) -> &[Point3<F>] {
        &self.face_centres
    }

    /// Returns a slice with the area vectors of all faces.
    pub fn face_areas(&self) -> &[Vec3<F>] {
        &self.face_areas
    }

    /// Returns a slice with the centres of all cells.
    pub fn cell_centres(&self) -> &[Point3<F>] {
        &self.cell_centres
    }

    /// Returns a slice with the volumes of all cells.
    pub fn cell_volumes(&self) -> &[F] {
        &self.cell_volumes
    }

    /// Returns the indices of the faces of the given cell.
    pub fn cell_faces(&self, cell: usize) -> &[usize] {
        &self.cell_faces[cell]
    }

    /// Returns the indices of the cells sharing the given point.
    pub fn point_cells(&self, point: usize) -> &[usize] {
        &self.point_cells[point]
    }

    /// Returns the normalized inverse distance weights of the cells sharing the
    /// given point, in the same order as `point_cells`.
    pub fn point_cell_weights(&self, point: usize) -> &[F] {
        &self.point_cell_weights[point]
    }

    /// Returns the owner cell of the given face.
    pub fn owner(&self, face: usize) -> usize {
        self.owner[face]
    }

    /// Returns the neighbour cell of the given face, or `None` for a boundary face.
    pub fn neighbour(&self, face: usize) -> Option<usize> {
        self.neighbour.get(face).copied()
    }

    /// Whether the given face is shared by two cells.
    pub fn is_internal_face(&self, face: usize) -> bool {
        face < self.neighbour.len()
    }

    /// Returns an `InvalidIndex` error unless the given cell exists.
    pub fn check_cell(&self, cell: usize) -> InterpResult<()> {
        check_index(IndexKind::Cell, cell, self.n_cells())
    }

    /// Returns an `InvalidIndex` error unless the given face exists.
    pub fn check_face(&self, face: usize) -> InterpResult<()> {
        check_index(IndexKind::Face, face, self.n_faces())
    }

    /// Returns an error unless the given face exists and is one of the faces
    /// of the given existing cell.
    pub fn check_cell_face(&self, cell: usize, face: usize) -> InterpResult<()> {
        self.check_cell(cell)?;
        self.check_face(face)?;
        if self.cell_faces[cell].contains(&face) {
            Ok(())
        } else {
            Err(InterpolationError::FaceNotOnCell { face, cell })
        }
    }

    /// Returns the number of tetrahedra in the decomposition of the given cell.
    pub fn n_cell_tets(&self, cell: usize) -> usize {
        self.cell_faces[cell]
            .iter()
            .map(|&face| self.faces[face].len())
            .sum()
    }

    /// Iterates over the tetrahedra in the decomposition of the given cell
    /// that have a face on the given mesh face.
    pub fn face_tets(&self, cell: usize, face: usize) -> impl Iterator<Item = TetIndices> {
        (0..self.faces[face].len()).map(move |tet_point| TetIndices::new(cell, face, tet_point))
    }

    /// Iterates over all tetrahedra in the decomposition of the given cell.
    ///
    /// There is one tetrahedron per face edge, spanned by the cell centre,
    /// the face centre and the two end points of the edge.
    pub fn cell_tets(&self, cell: usize) -> impl Iterator<Item = TetIndices> + '_ {
        self.cell_faces[cell]
            .iter()
            .flat_map(move |&face| self.face_tets(cell, face))
    }

    /// Returns the indices of the two face points of the given tetrahedron.
    pub fn tet_face_points(&self, tet: &TetIndices) -> (usize, usize) {
        let face_points = &self.faces[tet.face()];
        (
            face_points[tet.tet_point()],
            face_points[(tet.tet_point() + 1) % face_points.len()],
        )
    }

    /// Returns the tetrahedron with the given indices.
    pub fn tet(&self, tet: &TetIndices) -> Tetrahedron<F> {
        let (first_point, second_point) = self.tet_face_points(tet);
        Tetrahedron::new(
            self.cell_centres[tet.cell()],
            self.face_centres[tet.face()],
            self.points[first_point],
            self.points[second_point],
        )
    }

    /// Finds the cell whose centre is closest to the given point,
    /// or `None` if the mesh has no cells.
    pub fn find_nearest_cell(&self, point: &Point3<F>) -> Option<usize> {
        self.cell_centres
            .iter()
            .map(|centre| (*point - *centre).squared_length())
            .enumerate()
            .fold(None, |nearest: Option<(usize, F)>, (cell, distance)| match nearest {
                Some((_, nearest_distance)) if nearest_distance <= distance => nearest,
                _ => Some((cell, distance)),
            })
            .map(|(cell, _)| cell)
    }

    fn compute_face_centre_and_area(
        points: &[Point3<F>],
        face_points: &[usize],
    ) -> (Point3<F>, Vec3<F>) {
        let half = F::from_f64(0.5).unwrap();
        let third = F::from_f64(1.0 / 3.0).unwrap();

        if face_points.len() == 3 {
            let (p0, p1, p2) = (
                points[face_points[0]],
                points[face_points[1]],
                points[face_points[2]],
            );
            let centre = Point3::from_vec3((p0.to_vec3() + p1.to_vec3() + p2.to_vec3()) * third);
            let area = (p1 - p0).cross(&(p2 - p0)) * half;
            return (centre, area);
        }

        let estimated_centre =
            Point3::average(face_points.iter().map(|&idx| &points[idx])).unwrap();

        let mut sum_normal = Vec3::zero();
        let mut sum_area = F::zero();
        let mut sum_area_weighted_centre = Vec3::zero();

        for (idx, &point_idx) in face_points.iter().enumerate() {
            let this_point = points[point_idx];
            let next_point = points[face_points[(idx + 1) % face_points.len()]];

            let triangle_centre_sum =
                this_point.to_vec3() + next_point.to_vec3() + estimated_centre.to_vec3();
            let normal = (next_point - this_point).cross(&(estimated_centre - this_point));
            let area = normal.length();

            sum_normal = sum_normal + normal;
            sum_area = sum_area + area;
            sum_area_weighted_centre = sum_area_weighted_centre + triangle_centre_sum * area;
        }

        if sum_area <= F::min_positive_value() {
            (estimated_centre, Vec3::zero())
        } else {
            (
                Point3::from_vec3(sum_area_weighted_centre * (third / sum_area)),
                sum_normal * half,
            )
        }
    }

    fn compute_cell_centre_and_volume(
        faces: &[usize],
        face_centres: &[Point3<F>],
        face_areas: &[Vec3<F>],
    ) -> (Point3<F>, F) {
        let estimated_centre =
            Point3::average(faces.iter().map(|&face| &face_centres[face])).unwrap();

        let three_quarters = F::from_f64(0.75).unwrap();
        let quarter = F::from_f64(0.25).unwrap();

        let mut weighted_centre = Vec3::zero();
        let mut scaled_volume = F::zero();

        for &face in faces {
            // Three times the volume of the pyramid with the face as base
            let pyramid_volume =
                num::Float::abs(face_areas[face].dot(&(face_centres[face] - estimated_centre)));
            let pyramid_centre = face_centres[face].to_vec3() * three_quarters
                + estimated_centre.to_vec3() * quarter;

            weighted_centre = weighted_centre + pyramid_centre * pyramid_volume;
            scaled_volume = scaled_volume + pyramid_volume;
        }

        let three = F::from_f64(3.0).unwrap();
        if scaled_volume <= F::min_positive_value() {
            (estimated_centre, F::zero())
        } else {
            (
                Point3::from_vec3(weighted_centre * scaled_volume.recip()),
                scaled_volume / three,
            )
        }
    }

    fn compute_point_cells(
        n_points: usize,
        faces: &[Vec<usize>],
        cell_faces: &[Vec<usize>],
    ) -> Vec<Vec<usize>> {
        let mut point_cells = vec![Vec::new(); n_points];
        for (cell, cell_face_indices) in cell_faces.iter().enumerate() {
            for &face in cell_face_indices {
                for &point in &faces[face] {
                    if point_cells[point].last() != Some(&cell) {
                        point_cells[point].push(cell);
                    }
                }
            }
        }
        point_cells.iter_mut().for_each(|cells| {
            cells.sort_unstable();
            cells.dedup();
        });
        point_cells
    }

    fn compute_point_cell_weights(
        points: &[Point3<F>],
        point_cells: &[Vec<usize>],
        cell_centres: &[Point3<F>],
    ) -> Vec<Vec<F>> {
        points
            .iter()
            .zip(point_cells)
            .map(|(point, cells)| {
                let inverse_distances: Vec<F> = cells
                    .iter()
                    .map(|&cell| {
                        point
                            .distance_to(&cell_centres[cell])
                            .max(F::min_positive_value())
                            .recip()
                    })
                    .collect();
                let sum = inverse_distances
                    .iter()
                    .fold(F::zero(), |sum, &weight| sum + weight);
                inverse_distances
                    .into_iter()
                    .map(|weight| weight / sum)
                    .collect()
            })
            .collect()
    }
}
