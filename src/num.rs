//! Utilities related to numbers.

use crate::geometry::{Barycentric, SphericalTensor3, SymmTensor3, Tensor3, Vec3};
use ieee754;
use num;
use std::{
    fmt,
    ops::{Add, Mul},
};

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat:
    Sync + Send + num::Float + num::cast::FromPrimitive + ieee754::Ieee754 + fmt::Debug
{
}

impl BFloat for f32 {}
impl BFloat for f64 {}

/// Defines the properties of a value that can be stored in a cell field
/// and interpolated with floating point weights of type `F`.
///
/// Every interpolation scheme is written once in terms of this trait, so
/// scalars, vectors and tensors of any rank are interpolated identically,
/// component by component.
pub trait FieldValue<F: BFloat>:
    Copy + Send + Sync + PartialEq + fmt::Debug + Add<Output = Self> + Mul<F, Output = Self>
{
    /// Name of the kind of value, used in messages.
    const TYPE_NAME: &'static str;

    /// Returns the additive identity.
    fn zero() -> Self;

    /// Computes the sum of the given four values weighted by the given
    /// barycentric coordinates.
    fn barycentric_sum(values: &[Self; 4], coordinates: &Barycentric<F>) -> Self {
        values
            .iter()
            .zip(coordinates)
            .fold(Self::zero(), |sum, (&value, &weight)| sum + value * weight)
    }
}

macro_rules! impl_field_value {
    ($T:ty, $F:ty, $name:expr) => {
        impl FieldValue<$F> for $T {
            const TYPE_NAME: &'static str = $name;

            fn zero() -> Self {
                <$T>::zero()
            }
        }
    };
}

macro_rules! impl_scalar_field_value {
    ($F:ty) => {
        impl FieldValue<$F> for $F {
            const TYPE_NAME: &'static str = "scalar";

            fn zero() -> Self {
                0.0
            }
        }
    };
}

impl_scalar_field_value!(f32);
impl_scalar_field_value!(f64);
impl_field_value!(Vec3<f32>, f32, "vector");
impl_field_value!(Vec3<f64>, f64, "vector");
impl_field_value!(SphericalTensor3<f32>, f32, "spherical_tensor");
impl_field_value!(SphericalTensor3<f64>, f64, "spherical_tensor");
impl_field_value!(SymmTensor3<f32>, f32, "symm_tensor");
impl_field_value!(SymmTensor3<f64>, f64, "symm_tensor");
impl_field_value!(Tensor3<f32>, f32, "tensor");
impl_field_value!(Tensor3<f64>, f64, "tensor");

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn barycentric_sum_of_tet_vertex_values_works() {
        let coordinates = Barycentric::new(0.25, 0.25, 0.25, 0.25);
        let sum = f64::barycentric_sum(&[8.0, 9.0, 11.0, 12.0], &coordinates);
        assert_abs_diff_eq!(sum, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn barycentric_sum_is_component_wise_for_every_rank() {
        let coordinates = Barycentric::new(0.1, 0.2, 0.3, 0.4);
        let vectors = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ];
        let sum = Vec3::<f64>::barycentric_sum(&vectors, &coordinates);
        assert_abs_diff_eq!(sum, Vec3::new(0.5, 0.6, 0.7), epsilon = 1e-12);

        let tensors = [
            SymmTensor3::new(1.0, 0.0, 0.0, 1.0, 0.0, 1.0),
            SymmTensor3::new(2.0, 0.0, 0.0, 2.0, 0.0, 2.0),
            SymmTensor3::new(3.0, 0.0, 0.0, 3.0, 0.0, 3.0),
            SymmTensor3::new(4.0, 1.0, 0.0, 4.0, 0.0, 4.0),
        ];
        let sum = SymmTensor3::<f64>::barycentric_sum(&tensors, &coordinates);
        assert_abs_diff_eq!(
            sum,
            SymmTensor3::new(3.0, 0.4, 0.0, 3.0, 0.0, 3.0),
            epsilon = 1e-12
        );
    }
}
