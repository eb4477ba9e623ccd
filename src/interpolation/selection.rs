//! Selection of interpolation schemes for named fields.

use super::registry::DEFAULT_SCHEME_NAME;
use crate::{
    io::{param::ParameterSet, Verbosity},
    locate::{LocatorConfig, OutsidePolicy},
    num::BFloat,
};
use std::{collections::HashMap, io, path::Path};

const DEFAULT_KEY: &str = "default";
const OUTSIDE_POLICY_KEY: &str = "outside_policy";
const LOCATE_TOLERANCE_KEY: &str = "locate_tolerance";
const DEGENERACY_TOLERANCE_KEY: &str = "degeneracy_tolerance";

/// Which interpolation scheme to use for each field.
///
/// In parameter text, every assignment names a field and the scheme to use for
/// it, except for these reserved names:
///
/// - `default`: Scheme to use for fields without an entry.
/// - `outside_policy`: How to treat positions outside the queried cell
/// (`extrapolate`, `clamp` or `reject`).
/// - `locate_tolerance`: How negative a barycentric coordinate may be for
/// a position to still count as inside.
/// - `degeneracy_tolerance`: Relative volume below which tetrahedra are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemeSelection<F: BFloat> {
    default_scheme: Option<String>,
    field_schemes: HashMap<String, String>,
    locator_config: LocatorConfig<F>,
}

impl<F: BFloat> SchemeSelection<F> {
    /// Creates a new empty selection, which uses the `cell` scheme for every field.
    pub fn new() -> Self {
        Self {
            default_scheme: None,
            field_schemes: HashMap::new(),
            locator_config: LocatorConfig::default(),
        }
    }

    /// Returns the selection with the given default scheme.
    pub fn with_default_scheme(mut self, scheme_name: &str) -> Self {
        self.default_scheme = Some(scheme_name.to_string());
        self
    }

    /// Returns the selection with the given scheme for the given field.
    pub fn with_field_scheme(mut self, field_name: &str, scheme_name: &str) -> Self {
        self.field_schemes
            .insert(field_name.to_string(), scheme_name.to_string());
        self
    }

    /// Returns the selection with the given locator configuration.
    pub fn with_locator_config(mut self, locator_config: LocatorConfig<F>) -> Self {
        self.locator_config = locator_config;
        self
    }

    /// Parses a selection from the given parameter text.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the parsed selection.
    /// - `Err`: Contains an error for a malformed line or an invalid value of a
    /// reserved parameter.
    pub fn parse(text: &str) -> io::Result<Self> {
        Self::from_parameters(&ParameterSet::parse(text)?)
    }

    /// Reads and parses a selection from the parameter file at the given path.
    pub fn from_file<P: AsRef<Path>>(file_path: P, verbosity: &Verbosity) -> io::Result<Self> {
        let file_path = file_path.as_ref();
        if verbosity.print_messages() {
            println!(
                "Reading interpolation schemes from {}",
                file_path.display()
            );
        }
        Self::from_parameters(&ParameterSet::from_file(file_path)?)
    }

    /// Returns the default scheme name, if specified.
    pub fn default_scheme(&self) -> Option<&str> {
        self.default_scheme.as_deref()
    }

    /// Returns the scheme name specified for the given field, if any.
    pub fn field_scheme(&self, field_name: &str) -> Option<&str> {
        self.field_schemes.get(field_name).map(String::as_str)
    }

    /// Returns the name of the scheme to use for the given field.
    ///
    /// This is the scheme specified for the field, or else the default scheme,
    /// or else `cell`.
    pub fn scheme_name_for(&self, field_name: &str) -> &str {
        self.field_scheme(field_name)
            .or_else(|| self.default_scheme())
            .unwrap_or(DEFAULT_SCHEME_NAME)
    }

    /// Returns a reference to the locator configuration.
    pub fn locator_config(&self) -> &LocatorConfig<F> {
        &self.locator_config
    }

    fn from_parameters(parameters: &ParameterSet) -> io::Result<Self> {
        let mut selection = Self::new();

        for (name, value) in parameters.iter() {
            match name {
                DEFAULT_KEY => selection.default_scheme = Some(value.to_string()),
                OUTSIDE_POLICY_KEY | LOCATE_TOLERANCE_KEY | DEGENERACY_TOLERANCE_KEY => {}
                field_name => {
                    selection
                        .field_schemes
                        .insert(field_name.to_string(), value.to_string());
                }
            }
        }

        if let Some(policy) = parameters.get_str_param(OUTSIDE_POLICY_KEY) {
            selection.locator_config.outside_policy = policy
                .parse::<OutsidePolicy>()
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        }
        if let Some(tolerance) = Self::get_float_param(parameters, LOCATE_TOLERANCE_KEY)? {
            selection.locator_config.tolerance = tolerance;
        }
        if let Some(tolerance) = Self::get_float_param(parameters, DEGENERACY_TOLERANCE_KEY)? {
            selection.locator_config.degeneracy_tolerance = tolerance;
        }
        Ok(selection)
    }

    fn get_float_param(parameters: &ParameterSet, name: &str) -> io::Result<Option<F>> {
        match parameters.get_numerical_param::<f64>(name)? {
            Some(value) => F::from_f64(value).map(Some).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Value {} of parameter {} is not representable", value, name),
                )
            }),
            None => Ok(None),
        }
    }
}

impl<F: BFloat> Default for SchemeSelection<F> {
    fn default() -> Self {
        Self::new()
    }
}
