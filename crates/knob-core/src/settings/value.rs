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

//! Runtime values held by settings.

use super::metadata::SettingKind;
use crate::math::{LinearRgba, Vec3};

/// The current value of a non-button setting.
///
/// This is also the "raw value" type carried by edit events: a UI or a preset
/// file proposes a `SettingValue`, and validation turns it into the value that
/// is actually stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingValue {
    /// A boolean toggle.
    Bool(bool),
    /// A float.
    Float(f32),
    /// A signed integer.
    Int(i32),
    /// An enum ordinal.
    Enum(u32),
    /// An opaque linear color.
    Color(LinearRgba),
    /// A world-space direction.
    Direction(Vec3),
}

impl SettingValue {
    /// The setting kind this value belongs to.
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Bool(_) => SettingKind::Bool,
            SettingValue::Float(_) => SettingKind::Float,
            SettingValue::Int(_) => SettingKind::Int,
            SettingValue::Enum(_) => SettingKind::Enum,
            SettingValue::Color(_) => SettingKind::Color,
            SettingValue::Direction(_) => SettingKind::Direction,
        }
    }

    /// Returns the boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            SettingValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the float, if this is a `Float`.
    pub fn as_float(&self) -> Option<f32> {
        match *self {
            SettingValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            SettingValue::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the ordinal, if this is an `Enum`.
    pub fn as_enum(&self) -> Option<u32> {
        match *self {
            SettingValue::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the color, if this is a `Color`.
    pub fn as_color(&self) -> Option<LinearRgba> {
        match *self {
            SettingValue::Color(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the direction, if this is a `Direction`.
    pub fn as_direction(&self) -> Option<Vec3> {
        match *self {
            SettingValue::Direction(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as `f64` for the numeric kinds (`Float` and `Int`).
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            SettingValue::Float(v) => Some(v as f64),
            SettingValue::Int(v) => Some(v as f64),
            _ => None,
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SettingValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    SettingValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_value!(
    bool => Bool,
    f32 => Float,
    i32 => Int,
    LinearRgba => Color,
    Vec3 => Direction,
);

/// Field type of a direction setting.
pub type Direction = Vec3;

/// Field type of a color setting.
pub type Color = LinearRgba;

/// Marker type for a fire-once action field in a `#[derive(Settings)]` struct.
///
/// It carries no state; the pressed signal lives in the settings context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Button;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(SettingValue::Enum(2).kind(), SettingKind::Enum);
        assert_eq!(
            SettingValue::Direction(Vec3::Y).kind(),
            SettingKind::Direction
        );
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let v = SettingValue::Float(2.5);
        assert_eq!(v.as_float(), Some(2.5));
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.as_f64(), Some(2.5));
        assert_eq!(SettingValue::Int(-3).as_f64(), Some(-3.0));
        assert_eq!(SettingValue::Bool(true).as_f64(), None);
    }
}
