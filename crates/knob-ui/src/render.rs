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

//! Group traversal and edit routing.

use crate::backend::UiBackend;
use crate::control::{control_kind_for, ControlKind};
use knob_core::math::Mat4;
use knob_core::settings::{
    GroupChild, SettingDescriptor, SettingGroup, SettingId, SettingValue, ValidationError,
};
use knob_data::{AcceptedValue, SchemaRegistry, ValueStore};

/// Something the user did this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A control returned a new value; `outcome` is what validation made of it.
    Edited {
        /// The edited setting.
        id: SettingId,
        /// The stored value, or why the edit was refused.
        outcome: Result<AcceptedValue, ValidationError>,
    },
    /// A button was clicked.
    ButtonPressed {
        /// The button.
        id: SettingId,
    },
}

/// One row of the flattened UI layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutItem<'a> {
    /// Qualified path of the enclosing group (empty at the root).
    pub group_path: &'a str,
    /// The setting.
    pub descriptor: &'a SettingDescriptor,
    /// The control that edits it.
    pub control: ControlKind,
}

/// Lists every setting under `group` in display order.
///
/// Collapse state and visibility are ignored, so the result is the same on
/// every call.
pub fn layout_items<'a>(registry: &'a SchemaRegistry, group: &'a SettingGroup) -> Vec<LayoutItem<'a>> {
    let mut items = Vec::new();
    collect(registry, group, &mut items);
    items
}

fn collect<'a>(registry: &'a SchemaRegistry, group: &'a SettingGroup, items: &mut Vec<LayoutItem<'a>>) {
    for child in &group.children {
        match child {
            GroupChild::Setting(id) => {
                if let Some(descriptor) = registry.descriptor(*id) {
                    items.push(LayoutItem {
                        group_path: &group.path,
                        descriptor,
                        control: control_kind_for(descriptor),
                    });
                }
            }
            GroupChild::Group(nested) => collect(registry, nested, items),
        }
    }
}

/// Draws the contents of `group` and applies the edits.
///
/// Nested groups become collapsible sections; `group` itself is drawn without
/// a header. Hidden settings are skipped. View-space directions are shown
/// transformed by `view` and converted back to world space before they are
/// validated. Button clicks are reported but not acted upon.
pub fn render_group(
    ui: &mut dyn UiBackend,
    registry: &SchemaRegistry,
    group: &SettingGroup,
    store: &mut ValueStore,
    view: &Mat4,
) -> Vec<UiEvent> {
    let mut pass = RenderPass {
        registry,
        store,
        view,
        events: Vec::new(),
    };
    pass.children(ui, group);
    pass.events
}

struct RenderPass<'a> {
    registry: &'a SchemaRegistry,
    store: &'a mut ValueStore,
    view: &'a Mat4,
    events: Vec<UiEvent>,
}

impl RenderPass<'_> {
    fn children(&mut self, ui: &mut dyn UiBackend, group: &SettingGroup) {
        for child in &group.children {
            match child {
                GroupChild::Setting(id) => self.setting(ui, *id),
                GroupChild::Group(nested) => {
                    ui.group(&nested.label, nested.expanded, &mut |ui: &mut dyn UiBackend| {
                        self.children(ui, nested)
                    });
                }
            }
        }
    }

    fn setting(&mut self, ui: &mut dyn UiBackend, id: SettingId) {
        let Some(descriptor) = self.registry.descriptor(id) else {
            return;
        };
        if !self.store.is_visible(id) {
            return;
        }

        let current = self.store.get(id);
        let edited = match control_kind_for(descriptor) {
            ControlKind::Button => {
                if ui.button(descriptor) {
                    self.events.push(UiEvent::ButtonPressed { id });
                }
                return;
            }
            ControlKind::Toggle => current
                .and_then(|v| v.as_bool())
                .and_then(|v| ui.toggle(descriptor, v))
                .map(SettingValue::Bool),
            ControlKind::Slider => current
                .and_then(|v| v.as_float())
                .and_then(|v| ui.slider_f32(descriptor, v))
                .map(SettingValue::Float),
            ControlKind::IntSlider => current
                .and_then(|v| v.as_int())
                .and_then(|v| ui.slider_i32(descriptor, v))
                .map(SettingValue::Int),
            ControlKind::Dropdown => {
                let last = descriptor.enum_labels.len().saturating_sub(1);
                let shown = self
                    .store
                    .enum_limit(id)
                    .map_or(last, |limit| (limit as usize).min(last));
                current
                    .and_then(|v| v.as_enum())
                    .and_then(|v| ui.dropdown(descriptor, v, &descriptor.enum_labels[..=shown]))
                    .map(SettingValue::Enum)
            }
            ControlKind::ColorSwatch => current
                .and_then(|v| v.as_color())
                .and_then(|v| ui.color(descriptor, v))
                .map(SettingValue::Color),
            ControlKind::DirectionWidget => {
                let view = self.view;
                let world = current.and_then(|v| v.as_direction());
                let edited = if descriptor.view_space {
                    // The rotation part of a view matrix is orthonormal.
                    world
                        .and_then(|w| ui.direction(descriptor, view.transform_vector3(w)))
                        .map(|edited| view.transpose().transform_vector3(edited))
                } else {
                    world.and_then(|w| ui.direction(descriptor, w))
                };
                edited.map(SettingValue::Direction)
            }
        };

        if let Some(raw) = edited {
            let outcome = self.store.propose(self.registry, id, raw);
            if let Err(err) = &outcome {
                log::debug!("UI: Edit of '{}' refused: {err}", descriptor.qualified_name);
            }
            self.events.push(UiEvent::Edited { id, outcome });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knob_core::math::{LinearRgba, Vec3};
    use knob_core::settings::{GroupDecl, SchemaDecl, SettingAttributes, SettingDecl};

    /// Opens every group and edits nothing.
    #[derive(Default)]
    struct Passive {
        drawn: Vec<String>,
        kinds: Vec<ControlKind>,
        dropdown_len: Option<usize>,
    }

    impl UiBackend for Passive {
        fn group(&mut self, label: &str, _: bool, contents: &mut dyn FnMut(&mut dyn UiBackend)) {
            self.drawn.push(format!("[{label}]"));
            contents(self);
        }
        fn toggle(&mut self, d: &SettingDescriptor, _: bool) -> Option<bool> {
            self.kinds.push(ControlKind::Toggle);
            self.drawn.push(d.qualified_name.clone());
            None
        }
        fn slider_f32(&mut self, d: &SettingDescriptor, _: f32) -> Option<f32> {
            self.kinds.push(ControlKind::Slider);
            self.drawn.push(d.qualified_name.clone());
            None
        }
        fn slider_i32(&mut self, d: &SettingDescriptor, _: i32) -> Option<i32> {
            self.kinds.push(ControlKind::IntSlider);
            self.drawn.push(d.qualified_name.clone());
            None
        }
        fn dropdown(&mut self, d: &SettingDescriptor, _: u32, labels: &[String]) -> Option<u32> {
            self.kinds.push(ControlKind::Dropdown);
            self.drawn.push(d.qualified_name.clone());
            self.dropdown_len = Some(labels.len());
            None
        }
        fn color(&mut self, d: &SettingDescriptor, _: LinearRgba) -> Option<LinearRgba> {
            self.kinds.push(ControlKind::ColorSwatch);
            self.drawn.push(d.qualified_name.clone());
            None
        }
        fn direction(&mut self, d: &SettingDescriptor, _: Vec3) -> Option<Vec3> {
            self.kinds.push(ControlKind::DirectionWidget);
            self.drawn.push(d.qualified_name.clone());
            None
        }
        fn button(&mut self, d: &SettingDescriptor) -> bool {
            self.kinds.push(ControlKind::Button);
            self.drawn.push(d.qualified_name.clone());
            false
        }
    }

    fn registry() -> SchemaRegistry {
        let attrs = SettingAttributes::new;
        SchemaRegistry::build(&SchemaDecl::new(
            "S",
            GroupDecl::new("S")
                .setting(SettingDecl::boolean("vsync", true, attrs()))
                .group(
                    GroupDecl::new("debug")
                        .expanded(false)
                        .setting(SettingDecl::enumeration("view", 0, ["Lit", "Albedo", "Normals"], attrs()))
                        .setting(SettingDecl::float("secret", 0.0, attrs().hidden()))
                        .setting(SettingDecl::button("capture", attrs())),
                ),
        ))
        .unwrap()
    }

    #[test]
    fn test_layout_lists_hidden_settings() {
        let registry = registry();
        let items = layout_items(&registry, registry.root());
        let rows: Vec<(&str, &str, ControlKind)> = items
            .iter()
            .map(|i| (i.group_path, i.descriptor.name.as_str(), i.control))
            .collect();
        assert_eq!(
            rows,
            [
                ("", "vsync", ControlKind::Toggle),
                ("debug", "view", ControlKind::Dropdown),
                ("debug", "secret", ControlKind::Slider),
                ("debug", "capture", ControlKind::Button),
            ]
        );
    }

    #[test]
    fn test_each_control_kind_draws_its_widget() {
        let attrs = SettingAttributes::new;
        let registry = SchemaRegistry::build(&SchemaDecl::new(
            "All",
            GroupDecl::new("All")
                .setting(SettingDecl::button("capture", attrs()))
                .setting(SettingDecl::direction("light", Vec3::Y, attrs().view_space(true)))
                .setting(SettingDecl::color("tint", LinearRgba::WHITE, attrs().hdr(true)))
                .setting(SettingDecl::enumeration("mode", 0, ["A", "B"], attrs()))
                .setting(SettingDecl::int("count", 1, attrs()))
                .setting(SettingDecl::float("scale", 1.0, attrs()))
                .setting(SettingDecl::boolean("on", true, attrs())),
        ))
        .unwrap();
        let mut store = ValueStore::from_defaults(&registry);

        let mut ui = Passive::default();
        render_group(&mut ui, &registry, registry.root(), &mut store, &Mat4::IDENTITY);

        let expected: Vec<ControlKind> = layout_items(&registry, registry.root())
            .iter()
            .map(|item| item.control)
            .collect();
        assert_eq!(ui.kinds, expected);
        assert_eq!(ui.kinds.len(), 7);
    }

    #[test]
    fn test_render_skips_hidden_and_respects_enum_limit() {
        let registry = registry();
        let mut store = ValueStore::from_defaults(&registry);
        let view = registry.lookup("debug.view").unwrap();
        store.set_enum_limit(&registry, view, Some(1)).unwrap();

        let mut ui = Passive::default();
        let events = render_group(&mut ui, &registry, registry.root(), &mut store, &Mat4::IDENTITY);

        assert!(events.is_empty());
        assert_eq!(ui.drawn, ["vsync", "[Debug]", "debug.view", "debug.capture"]);
        assert_eq!(ui.dropdown_len, Some(2));
    }

    #[test]
    fn test_runtime_visibility_override() {
        let registry = registry();
        let mut store = ValueStore::from_defaults(&registry);
        store.set_visible(registry.lookup("vsync").unwrap(), false);
        store.set_visible(registry.lookup("debug.secret").unwrap(), true);

        let mut ui = Passive::default();
        render_group(&mut ui, &registry, registry.root(), &mut store, &Mat4::IDENTITY);
        assert_eq!(ui.drawn, ["[Debug]", "debug.view", "debug.secret", "debug.capture"]);
    }
}
