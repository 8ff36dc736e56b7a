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

//! egui implementation of [`UiBackend`].

use egui::{Color32, CollapsingHeader, ComboBox, DragValue, Response, Slider, Ui};
use knob_core::math::{LinearRgba, Vec3};
use knob_core::settings::SettingDescriptor;
use knob_ui::UiBackend;
use std::ops::RangeInclusive;

/// Drag speed for unbounded numbers and direction components.
const DRAG_SPEED: f64 = 0.01;

/// Draws settings into an [`egui::Ui`].
///
/// Sliders are used when a setting has both bounds, drag fields otherwise.
/// HDR colors get one drag field per channel since the picker stops at `1.0`.
pub struct EguiBackend<'a> {
    ui: &'a mut Ui,
}

impl<'a> EguiBackend<'a> {
    /// Wraps `ui`.
    pub fn new(ui: &'a mut Ui) -> Self {
        Self { ui }
    }
}

fn with_help(response: Response, descriptor: &SettingDescriptor) -> Response {
    if descriptor.help.is_empty() {
        response
    } else {
        response.on_hover_text(descriptor.help.as_str())
    }
}

fn bounds(descriptor: &SettingDescriptor) -> Option<RangeInclusive<f64>> {
    let c = &descriptor.constraints;
    Some(c.min?..=c.max?)
}

fn open_range(descriptor: &SettingDescriptor) -> RangeInclusive<f64> {
    let c = &descriptor.constraints;
    c.min.unwrap_or(f64::NEG_INFINITY)..=c.max.unwrap_or(f64::INFINITY)
}

impl UiBackend for EguiBackend<'_> {
    fn group(
        &mut self,
        label: &str,
        expanded: bool,
        contents: &mut dyn FnMut(&mut dyn UiBackend),
    ) {
        CollapsingHeader::new(label)
            .default_open(expanded)
            .show(self.ui, |ui| contents(&mut EguiBackend::new(ui)));
    }

    fn toggle(&mut self, descriptor: &SettingDescriptor, value: bool) -> Option<bool> {
        let mut value = value;
        let response = self.ui.checkbox(&mut value, descriptor.label.as_str());
        with_help(response, descriptor).changed().then_some(value)
    }

    fn slider_f32(&mut self, descriptor: &SettingDescriptor, value: f32) -> Option<f32> {
        let mut value = value as f64;
        let step = descriptor.constraints.step.unwrap_or(0.0);
        let response = match bounds(descriptor) {
            Some(range) => self.ui.add(
                Slider::new(&mut value, range)
                    .step_by(step)
                    .text(descriptor.label.as_str()),
            ),
            None => {
                self.ui
                    .horizontal(|ui| {
                        let drag = ui.add(
                            DragValue::new(&mut value)
                                .speed(DRAG_SPEED)
                                .range(open_range(descriptor)),
                        );
                        ui.label(descriptor.label.as_str());
                        drag
                    })
                    .inner
            }
        };
        with_help(response, descriptor)
            .changed()
            .then_some(value as f32)
    }

    fn slider_i32(&mut self, descriptor: &SettingDescriptor, value: i32) -> Option<i32> {
        let mut value = value;
        let response = match bounds(descriptor) {
            Some(range) => {
                let range = (*range.start() as i32)..=(*range.end() as i32);
                let slider = Slider::new(&mut value, range).text(descriptor.label.as_str());
                let slider = match descriptor.constraints.step {
                    Some(step) => slider.step_by(step),
                    None => slider,
                };
                self.ui.add(slider)
            }
            None => {
                self.ui
                    .horizontal(|ui| {
                        let drag = ui.add(DragValue::new(&mut value).range(open_range(descriptor)));
                        ui.label(descriptor.label.as_str());
                        drag
                    })
                    .inner
            }
        };
        with_help(response, descriptor).changed().then_some(value)
    }

    fn dropdown(
        &mut self,
        descriptor: &SettingDescriptor,
        selected: u32,
        labels: &[String],
    ) -> Option<u32> {
        let mut value = selected;
        let current = descriptor.enum_label(selected).unwrap_or_default();
        let inner = ComboBox::new(descriptor.id.0, descriptor.label.as_str())
            .selected_text(current)
            .show_ui(self.ui, |ui| {
                let mut changed = false;
                for (ordinal, label) in labels.iter().enumerate() {
                    changed |= ui
                        .selectable_value(&mut value, ordinal as u32, label.as_str())
                        .changed();
                }
                changed
            });
        with_help(inner.response, descriptor);
        (inner.inner == Some(true)).then_some(value)
    }

    fn color(&mut self, descriptor: &SettingDescriptor, value: LinearRgba) -> Option<LinearRgba> {
        let mut rgb = value.to_rgb_array();
        let changed = if descriptor.hdr {
            self.ui
                .horizontal(|ui| {
                    let mut changed = false;
                    for channel in &mut rgb {
                        changed |= ui
                            .add(
                                DragValue::new(channel)
                                    .speed(DRAG_SPEED)
                                    .range(0.0..=f32::MAX),
                            )
                            .changed();
                    }
                    // Preview clipped to displayable range.
                    let [r, g, b] = rgb.map(|c| c.clamp(0.0, 1.0));
                    let preview = Color32::from(egui::Rgba::from_rgb(r, g, b));
                    ui.colored_label(preview, "⏺");
                    with_help(ui.label(descriptor.label.as_str()), descriptor);
                    changed
                })
                .inner
        } else {
            self.ui
                .horizontal(|ui| {
                    let changed = ui.color_edit_button_rgb(&mut rgb).changed();
                    with_help(ui.label(descriptor.label.as_str()), descriptor);
                    changed
                })
                .inner
        };
        changed.then(|| LinearRgba::from_rgb_array(rgb))
    }

    fn direction(&mut self, descriptor: &SettingDescriptor, value: Vec3) -> Option<Vec3> {
        let mut xyz = value.to_array();
        let changed = self
            .ui
            .horizontal(|ui| {
                let mut changed = false;
                for (axis, component) in ["x", "y", "z"].into_iter().zip(&mut xyz) {
                    changed |= ui
                        .add(
                            DragValue::new(component)
                                .speed(DRAG_SPEED)
                                .range(-1.0..=1.0)
                                .prefix(format!("{axis}: ")),
                        )
                        .changed();
                }
                with_help(ui.label(descriptor.label.as_str()), descriptor);
                changed
            })
            .inner;
        changed.then(|| Vec3::from_array(xyz))
    }

    fn button(&mut self, descriptor: &SettingDescriptor) -> bool {
        let response = self.ui.button(descriptor.label.as_str());
        with_help(response, descriptor).clicked()
    }
}

