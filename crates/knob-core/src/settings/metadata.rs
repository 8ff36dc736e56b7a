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

//! Attributes that can be attached to a setting declaration.

use crate::math::{degrees_to_radians, radians_to_degrees};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The declared type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKind {
    /// An on/off toggle.
    Bool,
    /// A 32-bit float, optionally bounded and stepped.
    Float,
    /// A 32-bit signed integer, optionally bounded and stepped.
    Int,
    /// An ordinal into a fixed table of labels.
    Enum,
    /// An opaque linear RGB color.
    Color,
    /// A world-space unit direction.
    Direction,
    /// A fire-once action with no value.
    Button,
}

impl SettingKind {
    /// Returns `true` for the kinds that honor `min`, `max` and `step`.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, SettingKind::Float | SettingKind::Int)
    }

    /// Returns `true` for the kinds packed as a 16-byte vector.
    #[inline]
    pub fn is_vector(self) -> bool {
        matches!(self, SettingKind::Color | SettingKind::Direction)
    }

    /// A short lowercase name used in messages and generated headers.
    pub fn name(self) -> &'static str {
        match self {
            SettingKind::Bool => "bool",
            SettingKind::Float => "float",
            SettingKind::Int => "int",
            SettingKind::Enum => "enum",
            SettingKind::Color => "color",
            SettingKind::Direction => "direction",
            SettingKind::Button => "button",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A transform applied to a float setting before it reaches the shader.
///
/// The user always edits the unconverted value (e.g. degrees); the packer
/// writes the converted one (e.g. radians).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConversionMode {
    /// The value is packed as-is.
    #[default]
    None,
    /// Degrees in the UI, radians in the shader.
    DegreesToRadians,
    /// Radians in the UI, degrees in the shader.
    RadiansToDegrees,
    /// The shader receives the squared value.
    Square,
}

impl ConversionMode {
    /// Applies the conversion to `value`.
    #[inline]
    pub fn apply(self, value: f32) -> f32 {
        match self {
            ConversionMode::None => value,
            ConversionMode::DegreesToRadians => degrees_to_radians(value),
            ConversionMode::RadiansToDegrees => radians_to_degrees(value),
            ConversionMode::Square => value * value,
        }
    }
}

impl FromStr for ConversionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ConversionMode::None),
            "degrees_to_radians" => Ok(ConversionMode::DegreesToRadians),
            "radians_to_degrees" => Ok(ConversionMode::RadiansToDegrees),
            "square" => Ok(ConversionMode::Square),
            other => Err(format!("unknown conversion mode '{other}'")),
        }
    }
}

/// Numeric constraints. Only meaningful for [`SettingKind::Float`] and [`SettingKind::Int`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraints {
    /// Inclusive lower bound.
    pub min: Option<f64>,
    /// Inclusive upper bound.
    pub max: Option<f64>,
    /// Snapping increment, measured from `min` (or from zero when unbounded below).
    pub step: Option<f64>,
}

impl Constraints {
    /// Returns `true` if no constraint is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.step.is_none()
    }

    /// Returns `true` if `value` lies within the bounds that are set.
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Everything a schema author can say about a setting besides its name, type
/// and default.
///
/// Built with chained calls:
///
/// ```
/// use knob_core::settings::SettingAttributes;
///
/// let attrs = SettingAttributes::new()
///     .help("Atmospheric turbidity")
///     .min(1.0)
///     .max(10.0)
///     .shader_constant(false);
/// assert_eq!(attrs.constraints.max, Some(10.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SettingAttributes {
    /// Tooltip text.
    pub help: String,
    /// Label override. Derived from the identifier when absent.
    pub display_name: Option<String>,
    /// Numeric bounds and step.
    pub constraints: Constraints,
    /// Whether the setting is packed into the constant buffer.
    pub shader_constant: bool,
    /// Direction settings only: edit relative to the camera.
    pub view_space: bool,
    /// Color settings only: allow channels above `1.0`.
    pub hdr: bool,
    /// Float settings only: transform applied at pack time.
    pub conversion: ConversionMode,
    /// Hide the control initially. The setting still exists and is still packed.
    pub hidden: bool,
}

impl Default for SettingAttributes {
    fn default() -> Self {
        Self {
            help: String::new(),
            display_name: None,
            constraints: Constraints::default(),
            shader_constant: true,
            view_space: false,
            hdr: false,
            conversion: ConversionMode::None,
            hidden: false,
        }
    }
}

impl SettingAttributes {
    /// Creates the default attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the help text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Overrides the display label.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the inclusive lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.constraints.min = Some(min);
        self
    }

    /// Sets the inclusive upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.constraints.max = Some(max);
        self
    }

    /// Sets the snapping increment.
    pub fn step(mut self, step: f64) -> Self {
        self.constraints.step = Some(step);
        self
    }

    /// Includes or excludes the setting from the constant buffer.
    pub fn shader_constant(mut self, enabled: bool) -> Self {
        self.shader_constant = enabled;
        self
    }

    /// Marks a direction as edited in view space.
    pub fn view_space(mut self, enabled: bool) -> Self {
        self.view_space = enabled;
        self
    }

    /// Marks a color as HDR.
    pub fn hdr(mut self, enabled: bool) -> Self {
        self.hdr = enabled;
        self
    }

    /// Sets the pack-time conversion of a float.
    pub fn conversion(mut self, mode: ConversionMode) -> Self {
        self.conversion = mode;
        self
    }

    /// Hides the control initially.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_attributes_are_shader_visible() {
        let attrs = SettingAttributes::default();
        assert!(attrs.shader_constant);
        assert!(attrs.constraints.is_empty());
        assert!(!attrs.hdr);
    }

    #[test]
    fn test_conversion_modes() {
        assert_relative_eq!(
            ConversionMode::DegreesToRadians.apply(180.0),
            std::f32::consts::PI
        );
        assert_relative_eq!(ConversionMode::Square.apply(3.0), 9.0);
        assert_eq!(ConversionMode::None.apply(-14.0), -14.0);
    }

    #[test]
    fn test_conversion_mode_from_str() {
        assert_eq!(
            "degrees_to_radians".parse::<ConversionMode>(),
            Ok(ConversionMode::DegreesToRadians)
        );
        assert!("cubic".parse::<ConversionMode>().is_err());
    }

    #[test]
    fn test_constraints_contains() {
        let c = Constraints {
            min: Some(1.0),
            max: Some(10.0),
            step: None,
        };
        assert!(c.contains(1.0));
        assert!(c.contains(10.0));
        assert!(!c.contains(10.5));
        assert!(Constraints::default().contains(f64::MAX));
    }
}
