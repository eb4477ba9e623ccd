//! Parsing of parameter text with one `name = value` assignment per line.
//!
//! Everything following a `;` on a line is a comment. Names consist of word
//! characters, `.` and `:`. Values may be surrounded by double quotes, which
//! are stripped on lookup.

use super::utils;
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::HashMap, io, path::Path, str};

lazy_static! {
    static ref ASSIGNMENT_REGEX: Regex = Regex::new(r"^([\w.:]+)[ \t]*=[ \t]*(.*)$").unwrap();
}

/// Set of parameter names and values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterSet {
    values: HashMap<String, String>,
}

impl ParameterSet {
    /// Parses the given parameter text.
    ///
    /// Later assignments to the same name override earlier ones, and
    /// assignments without a value are ignored.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the parsed parameters.
    /// - `Err`: Contains an error for the first line that is neither blank, a
    /// comment nor an assignment.
    pub fn parse(text: &str) -> io::Result<Self> {
        let mut values = HashMap::new();
        for (line_idx, line) in text.lines().enumerate() {
            let content = line.split(';').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let captures = ASSIGNMENT_REGEX.captures(content).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Invalid parameter assignment on line {}: {}", line_idx + 1, line),
                )
            })?;
            if !captures[2].is_empty() {
                values.insert(captures[1].to_string(), captures[2].to_string());
            }
        }
        Ok(Self { values })
    }

    /// Reads and parses the parameter file at the given path.
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> io::Result<Self> {
        let text = utils::read_text_file(file_path)?;
        Self::parse(&text)
    }

    /// Iterates over all names and (unquoted) values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.trim_matches('"')))
    }

    /// Returns the value of the string parameter with the given name, if present.
    pub fn get_str_param(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|value| value.trim_matches('"'))
    }

    /// Returns the value of the numerical parameter with the given name, if present.
    pub fn get_numerical_param<T>(&self, name: &str) -> io::Result<Option<T>>
    where
        T: str::FromStr,
        T::Err: ToString,
    {
        match self.get_str_param(name) {
            Some(str_value) => str_value.parse::<T>().map(Some).map_err(|err| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Failed parsing value `{}` of parameter {}: {}",
                        str_value,
                        name,
                        err.to_string()
                    ),
                )
            }),
            None => Ok(None),
        }
    }
}
