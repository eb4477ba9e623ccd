//! Geometric utility objects and field value types.

use crate::num::BFloat;
use std::{
    fmt,
    ops::{Add, Index, IndexMut, Mul, Neg, Sub},
};

#[cfg(feature = "serialization")]
use serde::Serialize;

#[cfg(any(test, feature = "for-testing"))]
use approx::{AbsDiffEq, RelativeEq};

/// Denotes the x-, y- or z-dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dim3 {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Dim3 {
    /// Creates an array for iterating over the x-, y- and z-dimensions.
    pub fn slice() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dim3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
                Self::Z => "z",
            }
        )
    }
}

use Dim3::{X, Y, Z};

/// Implements component-wise addition, subtraction, negation and scaling
/// for a type wrapping a fixed-size array of floats.
macro_rules! impl_linear_ops {
    ($T:ident) => {
        impl<F: BFloat> Add for $T<F> {
            type Output = Self;
            fn add(mut self, other: Self) -> Self::Output {
                self.0
                    .iter_mut()
                    .zip(other.0.iter())
                    .for_each(|(a, &b)| *a = *a + b);
                self
            }
        }

        impl<F: BFloat> Sub for $T<F> {
            type Output = Self;
            fn sub(mut self, other: Self) -> Self::Output {
                self.0
                    .iter_mut()
                    .zip(other.0.iter())
                    .for_each(|(a, &b)| *a = *a - b);
                self
            }
        }

        impl<F: BFloat> Neg for $T<F> {
            type Output = Self;
            fn neg(mut self) -> Self::Output {
                self.0.iter_mut().for_each(|a| *a = -*a);
                self
            }
        }

        impl<F: BFloat> Mul<F> for $T<F> {
            type Output = Self;
            fn mul(mut self, factor: F) -> Self::Output {
                self.0.iter_mut().for_each(|a| *a = *a * factor);
                self
            }
        }

        #[cfg(any(test, feature = "for-testing"))]
        impl<F> AbsDiffEq for $T<F>
        where
            F: BFloat + AbsDiffEq<Epsilon = F>,
        {
            type Epsilon = F;

            fn default_epsilon() -> Self::Epsilon {
                F::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                self.0
                    .iter()
                    .zip(other.0.iter())
                    .all(|(a, b)| F::abs_diff_eq(a, b, epsilon))
            }
        }

        #[cfg(any(test, feature = "for-testing"))]
        impl<F> RelativeEq for $T<F>
        where
            F: BFloat + RelativeEq<Epsilon = F>,
        {
            fn default_max_relative() -> Self::Epsilon {
                F::default_max_relative()
            }

            fn relative_eq(
                &self,
                other: &Self,
                epsilon: Self::Epsilon,
                max_relative: Self::Epsilon,
            ) -> bool {
                self.0
                    .iter()
                    .zip(other.0.iter())
                    .all(|(a, b)| F::relative_eq(a, b, epsilon, max_relative))
            }
        }
    };
}

/// A 3D vector.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Vec3<F>([F; 3]);

impl<F: BFloat> Vec3<F> {
    /// Creates a new 3D vector given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self([x, y, z])
    }

    /// Creates a new 3D vector by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> F,
    {
        Self::new(create_component(X), create_component(Y), create_component(Z))
    }

    /// Creates a new zero vector.
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Computes the dot product of the vector with another vector.
    pub fn dot(&self, other: &Self) -> F {
        self[X] * other[X] + self[Y] * other[Y] + self[Z] * other[Z]
    }

    /// Computes the cross product of the vector with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self[Y] * other[Z] - self[Z] * other[Y],
            self[Z] * other[X] - self[X] * other[Z],
            self[X] * other[Y] - self[Y] * other[X],
        )
    }

    /// Computes the squared length of the vector.
    pub fn squared_length(&self) -> F {
        self.dot(self)
    }

    /// Computes the length of the vector.
    pub fn length(&self) -> F {
        self.squared_length().sqrt()
    }

    /// Returns the components of the vector as an array.
    pub fn to_array(&self) -> [F; 3] {
        self.0
    }
}

impl<F: BFloat> Index<Dim3> for Vec3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<F: BFloat> IndexMut<Dim3> for Vec3<F> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Vec3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self[X], self[Y], self[Z])
    }
}

impl_linear_ops!(Vec3);

/// A 3D point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Point3<F>([F; 3]);

impl<F: BFloat> Point3<F> {
    /// Creates a new 3D point given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self([x, y, z])
    }

    /// Creates a new 3D point at the origin.
    pub fn origin() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Creates a new 3D point from the given position vector.
    pub fn from_vec3(vector: Vec3<F>) -> Self {
        Self(vector.0)
    }

    /// Returns the position vector of the point.
    pub fn to_vec3(&self) -> Vec3<F> {
        Vec3(self.0)
    }

    /// Computes the distance to the given point.
    pub fn distance_to(&self, other: &Self) -> F {
        (*other - *self).length()
    }

    /// Computes the average of the given points, or `None` if there are none.
    pub fn average<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Self>,
        F: 'a,
    {
        let (sum, count) = points
            .into_iter()
            .fold((Vec3::zero(), 0_usize), |(sum, count), point| {
                (sum + point.to_vec3(), count + 1)
            });
        F::from_usize(count)
            .filter(|_| count > 0)
            .map(|count| Self::from_vec3(sum * count.recip()))
    }
}

impl<F: BFloat> Index<Dim3> for Point3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<F: BFloat> IndexMut<Dim3> for Point3<F> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl<F: BFloat> Sub for Point3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        Vec3::with_each_component(|dim| self[dim] - other[dim])
    }
}

impl<F: BFloat> Add<Vec3<F>> for Point3<F> {
    type Output = Self;
    fn add(self, vector: Vec3<F>) -> Self::Output {
        Self::from_vec3(self.to_vec3() + vector)
    }
}

impl<F: BFloat> Sub<Vec3<F>> for Point3<F> {
    type Output = Self;
    fn sub(self, vector: Vec3<F>) -> Self::Output {
        Self::from_vec3(self.to_vec3() - vector)
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Point3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self[X], self[Y], self[Z])
    }
}

#[cfg(any(test, feature = "for-testing"))]
impl<F> AbsDiffEq for Point3<F>
where
    F: BFloat + AbsDiffEq<Epsilon = F>,
{
    type Epsilon = F;

    fn default_epsilon() -> Self::Epsilon {
        F::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.to_vec3().abs_diff_eq(&other.to_vec3(), epsilon)
    }
}

/// A spherical second-rank tensor, i.e. a multiple of the identity tensor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct SphericalTensor3<F>([F; 1]);

impl<F: BFloat> SphericalTensor3<F> {
    /// Creates a new spherical tensor with the given diagonal component.
    pub fn new(ii: F) -> Self {
        Self([ii])
    }

    /// Creates a new zero tensor.
    pub fn zero() -> Self {
        Self::new(F::zero())
    }

    /// Returns the diagonal component.
    pub fn ii(&self) -> F {
        self.0[0]
    }
}

impl_linear_ops!(SphericalTensor3);

/// A symmetric second-rank tensor, storing the upper triangle
/// `xx, xy, xz, yy, yz, zz`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct SymmTensor3<F>([F; 6]);

impl<F: BFloat> SymmTensor3<F> {
    /// Creates a new symmetric tensor from its six independent components.
    pub fn new(xx: F, xy: F, xz: F, yy: F, yz: F, zz: F) -> Self {
        Self([xx, xy, xz, yy, yz, zz])
    }

    /// Creates a new zero tensor.
    pub fn zero() -> Self {
        Self([F::zero(); 6])
    }

    /// Returns the component for the given pair of dimensions.
    pub fn component(&self, row: Dim3, col: Dim3) -> F {
        let (i, j) = if row.num() <= col.num() {
            (row.num(), col.num())
        } else {
            (col.num(), row.num())
        };
        // Offset of row i in the packed upper triangle is 3i - i(i-1)/2
        self.0[3 * i - i * (i.max(1) - 1) / 2 + (j - i)]
    }
}

impl_linear_ops!(SymmTensor3);

/// A full second-rank tensor, stored row by row.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Tensor3<F>([F; 9]);

impl<F: BFloat> Tensor3<F> {
    /// Creates a new tensor from its rows.
    pub fn from_rows(x: Vec3<F>, y: Vec3<F>, z: Vec3<F>) -> Self {
        Self([
            x[X], x[Y], x[Z], y[X], y[Y], y[Z], z[X], z[Y], z[Z],
        ])
    }

    /// Creates a new zero tensor.
    pub fn zero() -> Self {
        Self([F::zero(); 9])
    }

    /// Returns the component for the given pair of dimensions.
    pub fn component(&self, row: Dim3, col: Dim3) -> F {
        self.0[3 * row.num() + col.num()]
    }
}

impl_linear_ops!(Tensor3);

/// Barycentric coordinates of a point with respect to the four vertices of a tetrahedron.
///
/// The coordinates weight, in order, the cell centre, the face centre and the
/// first and second face point of the tetrahedron they were computed for.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Barycentric<F>([F; 4]);

impl<F: BFloat> Barycentric<F> {
    /// Creates new barycentric coordinates from the four weights.
    pub fn new(a: F, b: F, c: F, d: F) -> Self {
        Self([a, b, c, d])
    }

    /// Returns the coordinates of the centroid of the tetrahedron.
    pub fn centroid() -> Self {
        let quarter = F::from_f64(0.25).unwrap_or_else(F::zero);
        Self([quarter; 4])
    }

    /// Returns the four weights as an array.
    pub fn coordinates(&self) -> [F; 4] {
        self.0
    }

    pub fn a(&self) -> F {
        self.0[0]
    }

    pub fn b(&self) -> F {
        self.0[1]
    }

    pub fn c(&self) -> F {
        self.0[2]
    }

    pub fn d(&self) -> F {
        self.0[3]
    }

    /// Computes the sum of the weights.
    pub fn sum(&self) -> F {
        self.0.iter().fold(F::zero(), |sum, &w| sum + w)
    }

    /// Returns the smallest of the weights.
    pub fn min(&self) -> F {
        self.0.iter().fold(F::infinity(), |min, &w| min.min(w))
    }

    /// Whether the point lies inside the tetrahedron, allowing each weight
    /// to be negative by at most the given tolerance.
    pub fn is_inside(&self, tolerance: F) -> bool {
        self.min() >= -tolerance
    }

    /// Returns the coordinates with negative weights set to zero and
    /// the remaining weights rescaled to sum to one.
    pub fn clamped(&self) -> Self {
        let mut clamped = self.0;
        clamped.iter_mut().for_each(|w| *w = w.max(F::zero()));
        let sum = clamped.iter().fold(F::zero(), |sum, &w| sum + w);
        if sum > F::zero() {
            clamped.iter_mut().for_each(|w| *w = *w / sum);
        }
        Self(clamped)
    }
}

impl<F> Index<usize> for Barycentric<F> {
    type Output = F;
    fn index(&self, vertex: usize) -> &Self::Output {
        &self.0[vertex]
    }
}

impl<'a, F> IntoIterator for &'a Barycentric<F> {
    type Item = &'a F;
    type IntoIter = ::std::slice::Iter<'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(any(test, feature = "for-testing"))]
impl<F> AbsDiffEq for Barycentric<F>
where
    F: BFloat + AbsDiffEq<Epsilon = F>,
{
    type Epsilon = F;

    fn default_epsilon() -> Self::Epsilon {
        F::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| F::abs_diff_eq(a, b, epsilon))
    }
}

/// A tetrahedron given by its four vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tetrahedron<F>([Point3<F>; 4]);

impl<F: BFloat> Tetrahedron<F> {
    /// Creates a new tetrahedron from its four vertices.
    pub fn new(a: Point3<F>, b: Point3<F>, c: Point3<F>, d: Point3<F>) -> Self {
        Self([a, b, c, d])
    }

    /// Returns the four vertices.
    pub fn vertices(&self) -> &[Point3<F>; 4] {
        &self.0
    }

    /// Computes six times the signed volume of the tetrahedron.
    pub fn scaled_signed_volume(&self) -> F {
        let [a, b, c, d] = self.0;
        (b - a).dot(&(c - a).cross(&(d - a)))
    }

    /// Computes the (unsigned) volume of the tetrahedron.
    pub fn volume(&self) -> F {
        num::Float::abs(self.scaled_signed_volume()) / F::from_f64(6.0).unwrap_or_else(F::one)
    }

    /// Computes the length of the longest edge.
    pub fn longest_edge(&self) -> F {
        let v = &self.0;
        [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
            .iter()
            .fold(F::zero(), |longest, &(i, j)| {
                longest.max(v[i].distance_to(&v[j]))
            })
    }

    /// Whether the volume is negligible compared to the cube of the longest edge.
    pub fn is_degenerate(&self, relative_tolerance: F) -> bool {
        let longest_edge = self.longest_edge();
        num::Float::abs(self.scaled_signed_volume())
            <= relative_tolerance * longest_edge.powi(3)
    }

    /// Computes the barycentric coordinates of the given point.
    ///
    /// The tetrahedron must not be degenerate.
    pub fn barycentric_coordinates(&self, point: &Point3<F>) -> Barycentric<F> {
        let [a, b, c, d] = self.0;
        let ab = b - a;
        let ac = c - a;
        let ad = d - a;
        let ap = *point - a;

        let det = ab.dot(&ac.cross(&ad));

        // Cramer's rule for ap = w_b*ab + w_c*ac + w_d*ad
        let w_b = ap.dot(&ac.cross(&ad)) / det;
        let w_c = ab.dot(&ap.cross(&ad)) / det;
        let w_d = ab.dot(&ac.cross(&ap)) / det;

        Barycentric::new(F::one() - w_b - w_c - w_d, w_b, w_c, w_d)
    }

    /// Computes the point with the given barycentric coordinates.
    pub fn point_at(&self, coordinates: &Barycentric<F>) -> Point3<F> {
        let sum = self
            .0
            .iter()
            .zip(coordinates)
            .fold(Vec3::zero(), |sum, (vertex, &w)| sum + vertex.to_vec3() * w);
        Point3::from_vec3(sum)
    }
}
