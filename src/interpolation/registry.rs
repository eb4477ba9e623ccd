//! Construction of interpolation schemes by name.

use super::{
    batch::FieldInterpolation, cell::CellInterpolation, cell_point::CellPointInterpolation,
    cell_point_face::CellPointFaceInterpolation, selection::SchemeSelection, Interpolation,
};
use crate::{
    error::{InterpResult, InterpolationError},
    field::CellField,
    geometry::{SphericalTensor3, SymmTensor3, Tensor3, Vec3},
    io::Verbosity,
    locate::LocatorConfig,
    num::{BFloat, FieldValue},
};
use lazy_static::lazy_static;
use paste::paste;
use std::{collections::BTreeMap, fmt};

/// Name of the scheme used when nothing else is specified.
pub const DEFAULT_SCHEME_NAME: &str = "cell";

/// An interpolation scheme bound to a field, owned by the caller.
pub type InterpolationHandle<'a, F, T> = Box<dyn Interpolation<F, T> + 'a>;

/// Function constructing an interpolation scheme bound to the given field.
pub type SchemeConstructor<F, T> =
    for<'a> fn(&'a CellField<F, T>, &LocatorConfig<F>) -> InterpolationHandle<'a, F, T>;

/// Table of interpolation scheme constructors for fields with values of type `T`.
#[derive(Clone)]
pub struct SchemeRegistry<F: BFloat, T: FieldValue<F>> {
    constructors: BTreeMap<&'static str, SchemeConstructor<F, T>>,
}

impl<F, T> SchemeRegistry<F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    /// Creates a new registry without any schemes.
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Creates a new registry containing all the built-in schemes.
    pub fn with_builtin_schemes() -> Self {
        Self::new()
            .with_scheme(
                CellInterpolation::<F, T>::NAME,
                create_cell_interpolation::<F, T>,
            )
            .with_scheme(
                CellPointInterpolation::<F, T>::NAME,
                create_cell_point_interpolation::<F, T>,
            )
            .with_scheme(
                CellPointFaceInterpolation::<F, T>::NAME,
                create_cell_point_face_interpolation::<F, T>,
            )
    }

    /// Returns the registry with the given scheme added.
    ///
    /// An existing scheme with the same name is replaced.
    pub fn with_scheme(mut self, name: &'static str, constructor: SchemeConstructor<F, T>) -> Self {
        self.constructors.insert(name, constructor);
        self
    }

    /// Returns the names of all registered schemes in alphabetical order.
    pub fn scheme_names(&self) -> Vec<&'static str> {
        self.constructors.keys().copied().collect()
    }

    /// Whether a scheme with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Constructs the scheme with the given name, bound to the given field.
    ///
    /// # Parameters
    ///
    /// - `name`: Name of the scheme to construct.
    /// - `field`: Field that the scheme will interpolate.
    /// - `config`: Configuration for locating positions within cells.
    ///
    /// # Returns
    ///
    /// A `InterpResult` which is either:
    ///
    /// - `Ok`: Contains the new scheme.
    /// - `Err`: Contains an `UnknownScheme` error listing the valid names if
    /// no scheme with the given name is registered.
    pub fn create<'a>(
        &self,
        name: &str,
        field: &'a CellField<F, T>,
        config: &LocatorConfig<F>,
    ) -> InterpResult<InterpolationHandle<'a, F, T>> {
        match self.constructors.get(name) {
            Some(constructor) => Ok(constructor(field, config)),
            None => Err(InterpolationError::UnknownScheme {
                name: name.to_string(),
                value_type: T::TYPE_NAME,
                known: self.scheme_names(),
            }),
        }
    }
}

impl<F, T> Default for SchemeRegistry<F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    fn default() -> Self {
        Self::with_builtin_schemes()
    }
}

impl<F, T> fmt::Debug for SchemeRegistry<F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeRegistry")
            .field("value_type", &T::TYPE_NAME)
            .field("schemes", &self.scheme_names())
            .finish()
    }
}

fn create_cell_interpolation<'a, F, T>(
    field: &'a CellField<F, T>,
    _config: &LocatorConfig<F>,
) -> InterpolationHandle<'a, F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    Box::new(CellInterpolation::new(field))
}

fn create_cell_point_interpolation<'a, F, T>(
    field: &'a CellField<F, T>,
    config: &LocatorConfig<F>,
) -> InterpolationHandle<'a, F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    Box::new(FieldInterpolation::new(CellPointInterpolation::new(
        field, config,
    )))
}

fn create_cell_point_face_interpolation<'a, F, T>(
    field: &'a CellField<F, T>,
    config: &LocatorConfig<F>,
) -> InterpolationHandle<'a, F, T>
where
    F: BFloat,
    T: FieldValue<F>,
{
    Box::new(FieldInterpolation::new(CellPointFaceInterpolation::new(
        field, config,
    )))
}

/// Field value type with a process-wide registry of interpolation schemes.
pub trait RegisteredFieldValue<F: BFloat + 'static>: FieldValue<F> + 'static {
    /// Returns the registry of built-in schemes for this value type.
    fn registry() -> &'static SchemeRegistry<F, Self>;
}

macro_rules! register_builtin_schemes {
    ($($T:ty, $F:ty, $registry_name:ident);+ $(;)?) => {
        paste! {
            lazy_static! {
                $(
                    static ref [<$registry_name:upper _SCHEME_REGISTRY>]: SchemeRegistry<$F, $T> =
                        SchemeRegistry::with_builtin_schemes();
                )+
            }

            $(
                impl RegisteredFieldValue<$F> for $T {
                    fn registry() -> &'static SchemeRegistry<$F, Self> {
                        &*[<$registry_name:upper _SCHEME_REGISTRY>]
                    }
                }
            )+
        }
    };
}

register_builtin_schemes!(
    f32, f32, scalar_f32;
    f64, f64, scalar_f64;
    Vec3<f32>, f32, vector_f32;
    Vec3<f64>, f64, vector_f64;
    SphericalTensor3<f32>, f32, spherical_tensor_f32;
    SphericalTensor3<f64>, f64, spherical_tensor_f64;
    SymmTensor3<f32>, f32, symm_tensor_f32;
    SymmTensor3<f64>, f64, symm_tensor_f64;
    Tensor3<f32>, f32, tensor_f32;
    Tensor3<f64>, f64, tensor_f64;
);

/// Constructs the built-in scheme with the given name, bound to the given
/// field, using the default locator configuration.
pub fn create_scheme<'a, F, T>(
    name: &str,
    field: &'a CellField<F, T>,
) -> InterpResult<InterpolationHandle<'a, F, T>>
where
    F: BFloat + 'static,
    T: RegisteredFieldValue<F>,
{
    create_scheme_with_config(name, field, &LocatorConfig::default())
}

/// Constructs the built-in scheme with the given name, bound to the given
/// field, using the given locator configuration.
pub fn create_scheme_with_config<'a, F, T>(
    name: &str,
    field: &'a CellField<F, T>,
    config: &LocatorConfig<F>,
) -> InterpResult<InterpolationHandle<'a, F, T>>
where
    F: BFloat + 'static,
    T: RegisteredFieldValue<F>,
{
    T::registry().create(name, field, config)
}

/// Constructs the built-in scheme selected for the given field.
///
/// # Parameters
///
/// - `selection`: Scheme names for specific fields and a default.
/// - `field`: Field that the scheme will interpolate.
/// - `verbosity`: Whether to print the chosen scheme.
///
/// # Returns
///
/// A `InterpResult` which is either:
///
/// - `Ok`: Contains the scheme selected for the field name, or for the
/// default if the field has no entry, or the `cell` scheme if there is no default.
/// - `Err`: Contains an `UnknownScheme` error if the selected name is not registered.
pub fn create_scheme_from_selection<'a, F, T>(
    selection: &SchemeSelection<F>,
    field: &'a CellField<F, T>,
    verbosity: &Verbosity,
) -> InterpResult<InterpolationHandle<'a, F, T>>
where
    F: BFloat + 'static,
    T: RegisteredFieldValue<F>,
{
    let name = selection.scheme_name_for(field.name());
    if verbosity.print_messages() {
        println!(
            "Interpolating {} field {} with scheme {}",
            T::TYPE_NAME,
            field.name(),
            name
        );
    }
    create_scheme_with_config(name, field, selection.locator_config())
}
