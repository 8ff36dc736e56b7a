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

use knob_core::settings::{SettingDescriptor, SettingKind};

/// The widget used to edit a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// A checkbox.
    Toggle,
    /// A float slider, or a drag field when unbounded.
    Slider,
    /// An integer slider, or a drag field when unbounded.
    IntSlider,
    /// A combo box over the enum labels.
    Dropdown,
    /// A color picker.
    ColorSwatch,
    /// A three-component direction editor.
    DirectionWidget,
    /// A push button.
    Button,
}

/// Picks the control for `descriptor`.
pub fn control_kind_for(descriptor: &SettingDescriptor) -> ControlKind {
    match descriptor.kind {
        SettingKind::Bool => ControlKind::Toggle,
        SettingKind::Float => ControlKind::Slider,
        SettingKind::Int => ControlKind::IntSlider,
        SettingKind::Enum => ControlKind::Dropdown,
        SettingKind::Color => ControlKind::ColorSwatch,
        SettingKind::Direction => ControlKind::DirectionWidget,
        SettingKind::Button => ControlKind::Button,
    }
}
