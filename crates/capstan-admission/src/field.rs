// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// The location of a field within an object, e.g. `spec.ports[0].fixedIPs`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(root: &str) -> Self {
        Self(root.to_owned())
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    pub fn index(&self, i: usize) -> Self {
        Self(format!("{}[{i}]", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    Display,
    EnumString,
)]
pub enum FieldErrorKind {
    /// The value is present but not permitted here.
    Forbidden,

    /// The value lies outside its domain.
    Invalid,

    /// The value changed on a field that must not change after creation.
    Immutable,
}

/// A single rule violation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Error)]
#[error("{path}: {kind}: {message}")]
pub struct FieldError {
    pub path: FieldPath,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn forbidden(path: FieldPath, message: impl Into<String>) -> Self {
        Self { path, kind: FieldErrorKind::Forbidden, message: message.into() }
    }

    pub fn invalid(path: FieldPath, message: impl Into<String>) -> Self {
        Self { path, kind: FieldErrorKind::Invalid, message: message.into() }
    }

    pub fn immutable(path: FieldPath, message: impl Into<String>) -> Self {
        Self { path, kind: FieldErrorKind::Immutable, message: message.into() }
    }
}

/// Every violation found in one object, in the order the rules found them.
/// Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// `Ok` if `errors` is empty, otherwise all of them as one rejection.
    pub fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.0.len())?;
        for e in &self.0 {
            write!(f, "; {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod test {
    use super::*;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn path_formatting() {
        let path = FieldPath::new("spec")
            .child("ports")
            .index(2)
            .child("fixedIPs")
            .index(0)
            .child("ipAddress");
        assert_eq!(path.to_string(), "spec.ports[2].fixedIPs[0].ipAddress");
    }

    #[test]
    fn kind_tokens() {
        assert_tokens(
            &FieldErrorKind::Immutable,
            &[Token::UnitVariant {
                name: "FieldErrorKind",
                variant: "Immutable",
            }],
        );
    }

    #[test]
    fn empty_list_is_not_an_error() {
        assert_eq!(ValidationErrors::check(Vec::new()), Ok(()));
    }

    #[test]
    fn errors_render_together() {
        let errors = ValidationErrors::check(vec![
            FieldError::invalid(FieldPath::new("a"), "bad"),
            FieldError::forbidden(FieldPath::new("b"), "nope"),
        ])
        .unwrap_err();
        assert_eq!(
            errors.to_string(),
            "2 validation error(s); a: Invalid: bad; b: Forbidden: nope"
        );
    }
}
