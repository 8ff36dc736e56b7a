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

//! The rules every proposed value goes through before it is stored.
//!
//! Validation is a pure function of the descriptor and the raw value. Values
//! that can be repaired (out of range, off the step grid, not normalized) are
//! repaired and flagged as `adjusted`; values that cannot are rejected with a
//! [`ValidationError`].

use knob_core::math::LinearRgba;
use knob_core::settings::{Constraints, SettingDescriptor, SettingKind, SettingValue};
use knob_core::ValidationError;

/// Tolerance under which a direction is already considered unit length.
pub const UNIT_LENGTH_TOLERANCE: f32 = 1e-6;

/// Fraction of a step by which a snapped value may overshoot `max` and still
/// count as landing on it.
const SNAP_TOLERANCE: f64 = 1e-6;

/// A value that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptedValue {
    /// The value to store.
    pub value: SettingValue,
    /// `true` if clamping, snapping or normalization changed the raw value.
    pub adjusted: bool,
}

impl AcceptedValue {
    fn new(value: SettingValue, adjusted: bool) -> Self {
        Self { value, adjusted }
    }
}

/// Validates `raw` against `descriptor`.
pub fn propose(
    descriptor: &SettingDescriptor,
    raw: SettingValue,
) -> Result<AcceptedValue, ValidationError> {
    propose_with_limit(descriptor, raw, None)
}

/// Validates `raw` against `descriptor`, additionally capping enum ordinals at
/// `enum_limit` when one is set.
pub fn propose_with_limit(
    descriptor: &SettingDescriptor,
    raw: SettingValue,
    enum_limit: Option<u32>,
) -> Result<AcceptedValue, ValidationError> {
    let name = || descriptor.qualified_name.clone();
    let mismatch = || ValidationError::TypeMismatch {
        name: name(),
        expected: descriptor.kind,
        found: raw.kind(),
    };

    match descriptor.kind {
        SettingKind::Button => Err(ValidationError::NotApplicable { name: name() }),

        SettingKind::Bool => match raw {
            SettingValue::Bool(_) => Ok(AcceptedValue::new(raw, false)),
            _ => Err(mismatch()),
        },

        SettingKind::Float => {
            let input = match raw {
                SettingValue::Float(v) => v as f64,
                SettingValue::Int(v) => v as f64,
                _ => return Err(mismatch()),
            };
            if input.is_nan() {
                return Err(ValidationError::NotANumber { name: name() });
            }
            let value = clamp_and_snap(input, &descriptor.constraints)
                .clamp(f32::MIN as f64, f32::MAX as f64) as f32;
            Ok(AcceptedValue::new(
                SettingValue::Float(value),
                value as f64 != input,
            ))
        }

        SettingKind::Int => {
            let input = match raw {
                SettingValue::Int(v) => v as f64,
                SettingValue::Float(v) if v.is_nan() => {
                    return Err(ValidationError::NotANumber { name: name() })
                }
                SettingValue::Float(v) => v as f64,
                _ => return Err(mismatch()),
            };
            // `as` saturates at the i32 bounds.
            let value = clamp_and_snap(input.round(), &descriptor.constraints).round() as i32;
            Ok(AcceptedValue::new(
                SettingValue::Int(value),
                value as f64 != input,
            ))
        }

        SettingKind::Enum => {
            let ordinal = match raw {
                SettingValue::Enum(v) => v as i64,
                SettingValue::Int(v) => v as i64,
                _ => return Err(mismatch()),
            };
            let count = descriptor.enum_labels.len();
            if ordinal < 0 || ordinal >= count as i64 {
                return Err(ValidationError::InvalidEnumValue {
                    name: name(),
                    ordinal,
                    count,
                });
            }
            let ordinal = ordinal as u32;
            let value = enum_limit.map_or(ordinal, |limit| ordinal.min(limit));
            Ok(AcceptedValue::new(SettingValue::Enum(value), value != ordinal))
        }

        SettingKind::Color => {
            let SettingValue::Color(color) = raw else {
                return Err(mismatch());
            };
            if color.has_nan() {
                return Err(ValidationError::NotANumber { name: name() });
            }
            let clamped = if descriptor.hdr {
                color.map_rgb(|c| c.clamp(0.0, f32::MAX))
            } else {
                color.map_rgb(|c| c.clamp(0.0, 1.0))
            };
            let value = LinearRgba::from_rgb_array(clamped.to_rgb_array());
            Ok(AcceptedValue::new(SettingValue::Color(value), value != color))
        }

        SettingKind::Direction => {
            let SettingValue::Direction(direction) = raw else {
                return Err(mismatch());
            };
            if direction.is_nan() {
                return Err(ValidationError::NotANumber { name: name() });
            }
            let length = direction.length();
            if length <= f32::EPSILON || !length.is_finite() {
                return Err(ValidationError::DegenerateDirection { name: name() });
            }
            if (length - 1.0).abs() <= UNIT_LENGTH_TOLERANCE {
                Ok(AcceptedValue::new(raw, false))
            } else {
                Ok(AcceptedValue::new(
                    SettingValue::Direction(direction.normalize()),
                    true,
                ))
            }
        }
    }
}

/// Clamps `value` into the bounds, then snaps it to the step grid.
///
/// The grid starts at `min` (or zero when unbounded below). A snapped value
/// that lands past `max` is pulled back one step.
pub fn clamp_and_snap(value: f64, constraints: &Constraints) -> f64 {
    let clamp = |v: f64| {
        let v = constraints.min.map_or(v, |min| v.max(min));
        constraints.max.map_or(v, |max| v.min(max))
    };

    let clamped = clamp(value);
    let Some(step) = constraints.step else {
        return clamped;
    };

    let origin = constraints.min.unwrap_or(0.0);
    let mut snapped = origin + ((clamped - origin) / step).round() * step;
    if constraints
        .max
        .is_some_and(|max| snapped - max > step * SNAP_TOLERANCE)
    {
        snapped -= step;
    }
    clamp(snapped)
}
