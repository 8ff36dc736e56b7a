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

use knob_core::math::{LinearRgba, Vec3};
use knob_core::settings::SettingDescriptor;

/// Drawing primitives needed to present settings.
///
/// Each control method receives the descriptor (label, help text and
/// constraints) and the value to display, and returns `Some(new_value)` only
/// when the user edited it this frame. The returned value is raw; the caller
/// validates it.
///
/// The trait is object safe so a context can drive any backend through
/// `&mut dyn UiBackend`.
pub trait UiBackend {
    /// Draws a collapsible section. `contents` is called with the same backend
    /// when the section is open; `expanded` is only the initial state.
    fn group(
        &mut self,
        label: &str,
        expanded: bool,
        contents: &mut dyn FnMut(&mut dyn UiBackend),
    );

    /// Draws a checkbox.
    fn toggle(&mut self, descriptor: &SettingDescriptor, value: bool) -> Option<bool>;

    /// Draws a float slider over the descriptor's bounds.
    fn slider_f32(&mut self, descriptor: &SettingDescriptor, value: f32) -> Option<f32>;

    /// Draws an integer slider over the descriptor's bounds.
    fn slider_i32(&mut self, descriptor: &SettingDescriptor, value: i32) -> Option<i32>;

    /// Draws a combo box. `labels` may be shorter than the descriptor's table
    /// when a runtime limit applies.
    fn dropdown(
        &mut self,
        descriptor: &SettingDescriptor,
        selected: u32,
        labels: &[String],
    ) -> Option<u32>;

    /// Draws a color picker. HDR colors may exceed `1.0`.
    fn color(&mut self, descriptor: &SettingDescriptor, value: LinearRgba) -> Option<LinearRgba>;

    /// Draws a direction editor.
    fn direction(&mut self, descriptor: &SettingDescriptor, value: Vec3) -> Option<Vec3>;

    /// Draws a button and returns `true` on the frame it is clicked.
    fn button(&mut self, descriptor: &SettingDescriptor) -> bool;
}
