// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the error types of the settings subsystem.

use super::metadata::SettingKind;
use std::fmt;

/// A schema declaration was rejected by the registry.
///
/// Raised once, at startup, when the declared tree is contradictory.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Two siblings, or two labels of one enum, share a name.
    DuplicateName {
        /// Qualified path of the parent group or enum setting (empty for the root).
        group: String,
        /// The repeated identifier.
        name: String,
    },
    /// `min` is greater than `max`.
    ContradictoryBounds {
        /// Qualified name of the setting.
        name: String,
        /// The declared minimum.
        min: f64,
        /// The declared maximum.
        max: f64,
    },
    /// A button carries numeric constraints.
    ButtonWithConstraints {
        /// Qualified name of the button.
        name: String,
    },
    /// A numeric default lies outside its declared bounds.
    DefaultOutOfRange {
        /// Qualified name of the setting.
        name: String,
        /// The declared default.
        default: f64,
        /// The declared minimum, if any.
        min: Option<f64>,
        /// The declared maximum, if any.
        max: Option<f64>,
    },
    /// A step is zero, negative or not finite.
    InvalidStep {
        /// Qualified name of the setting.
        name: String,
        /// The declared step.
        step: f64,
    },
    /// An enum was declared with no labels.
    EmptyEnum {
        /// Qualified name of the setting.
        name: String,
    },
    /// An enum default ordinal has no label.
    EnumDefaultOutOfRange {
        /// Qualified name of the setting.
        name: String,
        /// The declared default ordinal.
        ordinal: u32,
        /// Number of labels.
        count: usize,
    },
    /// A kind-specific hint was attached to the wrong kind.
    MisplacedHint {
        /// Qualified name of the setting.
        name: String,
        /// The hint, e.g. `view_space`.
        hint: &'static str,
        /// The kind it was attached to.
        kind: SettingKind,
    },
    /// A non-button setting has no default value.
    MissingDefault {
        /// Qualified name of the setting.
        name: String,
    },
    /// The default value does not match the declared kind.
    KindMismatch {
        /// Qualified name of the setting.
        name: String,
        /// The declared kind.
        declared: SettingKind,
        /// The kind of the default value.
        found: SettingKind,
    },
    /// A direction default is zero length or NaN.
    DegenerateDefault {
        /// Qualified name of the setting.
        name: String,
    },
    /// An identifier is empty or not usable in a qualified name or shader.
    InvalidName {
        /// The offending identifier.
        name: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::DuplicateName { group, name } => {
                if group.is_empty() {
                    write!(f, "Duplicate name '{name}' in the root group")
                } else {
                    write!(f, "Duplicate name '{name}' in group '{group}'")
                }
            }
            SchemaError::ContradictoryBounds { name, min, max } => {
                write!(f, "Setting '{name}' has min {min} greater than max {max}")
            }
            SchemaError::ButtonWithConstraints { name } => {
                write!(f, "Button '{name}' cannot carry min, max or step")
            }
            SchemaError::DefaultOutOfRange {
                name,
                default,
                min,
                max,
            } => {
                write!(
                    f,
                    "Default {default} of setting '{name}' lies outside [{min:?}, {max:?}]"
                )
            }
            SchemaError::InvalidStep { name, step } => {
                write!(f, "Setting '{name}' has invalid step {step}")
            }
            SchemaError::EmptyEnum { name } => {
                write!(f, "Enum setting '{name}' declares no values")
            }
            SchemaError::EnumDefaultOutOfRange {
                name,
                ordinal,
                count,
            } => {
                write!(
                    f,
                    "Enum setting '{name}' defaults to ordinal {ordinal} but has only {count} values"
                )
            }
            SchemaError::MisplacedHint { name, hint, kind } => {
                write!(f, "Hint '{hint}' is not valid on {kind} setting '{name}'")
            }
            SchemaError::MissingDefault { name } => {
                write!(f, "Setting '{name}' has no default value")
            }
            SchemaError::KindMismatch {
                name,
                declared,
                found,
            } => {
                write!(
                    f,
                    "Setting '{name}' is declared {declared} but its default is {found}"
                )
            }
            SchemaError::DegenerateDefault { name } => {
                write!(f, "Direction setting '{name}' has a zero-length default")
            }
            SchemaError::InvalidName { name } => {
                write!(f, "'{name}' is not a valid setting or group identifier")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// A proposed value was rejected.
///
/// Out-of-range values are not errors: they are clamped and reported as
/// adjusted. These variants cover values that cannot be repaired.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No setting has this identifier.
    UnknownSetting {
        /// The requested name or id.
        name: String,
    },
    /// The raw value cannot be coerced to the setting's kind.
    TypeMismatch {
        /// Qualified name of the setting.
        name: String,
        /// The setting's kind.
        expected: SettingKind,
        /// The kind of the proposed value.
        found: SettingKind,
    },
    /// An enum ordinal outside the label table.
    InvalidEnumValue {
        /// Qualified name of the setting.
        name: String,
        /// The proposed ordinal.
        ordinal: i64,
        /// Number of labels.
        count: usize,
    },
    /// A float or a component of a vector is NaN.
    NotANumber {
        /// Qualified name of the setting.
        name: String,
    },
    /// A direction of zero length cannot be normalized.
    DegenerateDirection {
        /// Qualified name of the setting.
        name: String,
    },
    /// Buttons hold no value.
    NotApplicable {
        /// Qualified name of the button.
        name: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownSetting { name } => {
                write!(f, "Unknown setting '{name}'")
            }
            ValidationError::TypeMismatch {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Setting '{name}' expects a {expected} value, got {found}"
                )
            }
            ValidationError::InvalidEnumValue {
                name,
                ordinal,
                count,
            } => {
                write!(
                    f,
                    "Ordinal {ordinal} is not valid for enum setting '{name}' ({count} values)"
                )
            }
            ValidationError::NotANumber { name } => {
                write!(f, "Setting '{name}' cannot be set to NaN")
            }
            ValidationError::DegenerateDirection { name } => {
                write!(f, "Direction setting '{name}' cannot be zero length")
            }
            ValidationError::NotApplicable { name } => {
                write!(f, "Button '{name}' has no value")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
