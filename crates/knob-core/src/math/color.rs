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

//! Defines the `LinearRgba` color type.

/// Represents a color in a **linear RGBA** color space using `f32` components.
///
/// The `f32` components allow for High Dynamic Range (HDR) colors, where component
/// values can exceed `1.0`. Color settings are opaque: only `r`, `g` and `b` are
/// editable, persisted, or packed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque white (`[1.0, 1.0, 1.0, 1.0]`).
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Creates a new `LinearRgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `LinearRgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns the `[r, g, b]` channels.
    #[inline]
    pub fn to_rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Creates an opaque color from `[r, g, b]`.
    #[inline]
    pub fn from_rgb_array(c: [f32; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }

    /// Applies `f` to the three color channels, keeping alpha.
    #[inline]
    pub fn map_rgb(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    /// Returns `true` if any color channel is NaN.
    #[inline]
    pub fn has_nan(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }
}

impl Default for LinearRgba {
    /// Returns opaque white.
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_is_opaque() {
        assert_eq!(LinearRgba::rgb(0.25, 0.25, 0.25).a, 1.0);
    }

    #[test]
    fn test_map_rgb_keeps_alpha() {
        let c = LinearRgba::new(2.0, -1.0, 0.5, 0.3).map_rgb(|v| v.clamp(0.0, 1.0));
        assert_eq!(c, LinearRgba::new(1.0, 0.0, 0.5, 0.3));
    }
}
