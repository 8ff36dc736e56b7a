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

//! The schema registry: flattens a declared schema into descriptors.

use knob_core::math::LinearRgba;
use knob_core::settings::naming::is_valid_identifier;
use knob_core::settings::{
    display_name, join_path, ConstantDecl, Constraints, ConversionMode, GroupChild, GroupDecl,
    ItemDecl, SchemaDecl, SchemaError, SettingDecl, SettingDescriptor, SettingGroup, SettingId,
    SettingKind, SettingValue,
};
use std::collections::{HashMap, HashSet};

/// The resolved, immutable view of a schema.
///
/// Settings are numbered depth first in declaration order. That order is the
/// iteration order of [`descriptors`](Self::descriptors), the UI layout order
/// and the constant-buffer packing order.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    name: String,
    descriptors: Vec<SettingDescriptor>,
    root: SettingGroup,
    constants: Vec<ConstantDecl>,
    /// Lookup only. Never iterated, so hash order cannot leak out.
    by_name: HashMap<String, SettingId>,
}

impl SchemaRegistry {
    /// Validates `schema` and flattens it.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found, in traversal order.
    pub fn build(schema: &SchemaDecl) -> Result<Self, SchemaError> {
        let mut builder = Builder::default();
        let root = builder.group(&schema.root, "", true)?;

        let mut constant_names = HashSet::new();
        for constant in &schema.constants {
            if !is_valid_identifier(&constant.name) {
                return Err(SchemaError::InvalidName {
                    name: constant.name.clone(),
                });
            }
            if !constant_names.insert(constant.name.as_str()) {
                return Err(SchemaError::DuplicateName {
                    group: String::new(),
                    name: constant.name.clone(),
                });
            }
        }

        log::info!(
            "SchemaRegistry: Built '{}' with {} settings and {} constants",
            schema.name,
            builder.descriptors.len(),
            schema.constants.len()
        );

        Ok(Self {
            name: schema.name.clone(),
            descriptors: builder.descriptors,
            root,
            constants: schema.constants.clone(),
            by_name: builder.by_name,
        })
    }

    /// The schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All descriptors, indexed by [`SettingId`].
    pub fn descriptors(&self) -> &[SettingDescriptor] {
        &self.descriptors
    }

    /// Returns the descriptor for `id`.
    pub fn descriptor(&self, id: SettingId) -> Option<&SettingDescriptor> {
        self.descriptors.get(id.index())
    }

    /// Resolves a qualified name to its id.
    pub fn lookup(&self, qualified_name: &str) -> Option<SettingId> {
        self.by_name.get(qualified_name).copied()
    }

    /// Returns the descriptor with the given qualified name.
    pub fn find(&self, qualified_name: &str) -> Option<&SettingDescriptor> {
        self.lookup(qualified_name)
            .and_then(|id| self.descriptor(id))
    }

    /// The root group.
    pub fn root(&self) -> &SettingGroup {
        &self.root
    }

    /// Schema constants in declaration order.
    pub fn constants(&self) -> &[ConstantDecl] {
        &self.constants
    }

    /// Number of settings, buttons included.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if the schema declares no settings.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterates over descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SettingDescriptor> {
        self.descriptors.iter()
    }
}

#[derive(Default)]
struct Builder {
    descriptors: Vec<SettingDescriptor>,
    by_name: HashMap<String, SettingId>,
}

impl Builder {
    fn group(&mut self, decl: &GroupDecl, path: &str, is_root: bool) -> Result<SettingGroup, SchemaError> {
        if !is_root && !is_valid_identifier(&decl.name) {
            return Err(SchemaError::InvalidName {
                name: decl.name.clone(),
            });
        }

        let mut siblings = HashSet::new();
        let mut children = Vec::with_capacity(decl.items.len());

        for item in &decl.items {
            let name = match item {
                ItemDecl::Setting(setting) => &setting.name,
                ItemDecl::Group(group) => &group.name,
            };
            if !siblings.insert(name.as_str()) {
                return Err(SchemaError::DuplicateName {
                    group: path.to_owned(),
                    name: name.clone(),
                });
            }

            match item {
                ItemDecl::Setting(setting) => {
                    children.push(GroupChild::Setting(self.setting(setting, path)?));
                }
                ItemDecl::Group(group) => {
                    let child_path = join_path(path, &group.name);
                    children.push(GroupChild::Group(self.group(group, &child_path, false)?));
                }
            }
        }

        Ok(SettingGroup {
            name: decl.name.clone(),
            path: path.to_owned(),
            label: decl
                .display_name
                .clone()
                .unwrap_or_else(|| display_name(&decl.name)),
            expanded: decl.expanded,
            children,
        })
    }

    fn setting(&mut self, decl: &SettingDecl, group_path: &str) -> Result<SettingId, SchemaError> {
        if !is_valid_identifier(&decl.name) {
            return Err(SchemaError::InvalidName {
                name: decl.name.clone(),
            });
        }

        let qualified_name = join_path(group_path, &decl.name);
        let default = check_setting(decl, &qualified_name)?;

        let id = SettingId(self.descriptors.len() as u32);
        let attrs = &decl.attrs;
        self.descriptors.push(SettingDescriptor {
            id,
            name: decl.name.clone(),
            qualified_name: qualified_name.clone(),
            group_path: group_path.to_owned(),
            kind: decl.kind,
            default,
            constraints: attrs.constraints,
            label: attrs
                .display_name
                .clone()
                .unwrap_or_else(|| display_name(&decl.name)),
            help: attrs.help.clone(),
            visible: !attrs.hidden,
            shader_visible: attrs.shader_constant && decl.kind != SettingKind::Button,
            view_space: attrs.view_space,
            hdr: attrs.hdr,
            conversion: attrs.conversion,
            enum_labels: decl.enum_labels.clone(),
        });
        self.by_name.insert(qualified_name, id);
        Ok(id)
    }
}

/// Checks one declaration and returns its canonical default.
fn check_setting(decl: &SettingDecl, name: &str) -> Result<Option<SettingValue>, SchemaError> {
    let attrs = &decl.attrs;
    let constraints = &attrs.constraints;
    let kind = decl.kind;

    let misplaced = |hint: &'static str| SchemaError::MisplacedHint {
        name: name.to_owned(),
        hint,
        kind,
    };
    if attrs.view_space && kind != SettingKind::Direction {
        return Err(misplaced("view_space"));
    }
    if attrs.hdr && kind != SettingKind::Color {
        return Err(misplaced("hdr"));
    }
    if attrs.conversion != ConversionMode::None && kind != SettingKind::Float {
        return Err(misplaced("convert"));
    }

    if kind == SettingKind::Button {
        if !constraints.is_empty() {
            return Err(SchemaError::ButtonWithConstraints {
                name: name.to_owned(),
            });
        }
        return Ok(None);
    }

    if !kind.is_numeric() && !constraints.is_empty() {
        let hint = if constraints.step.is_some() && constraints.min.is_none() && constraints.max.is_none() {
            "step"
        } else {
            "min/max"
        };
        return Err(misplaced(hint));
    }

    if let (Some(min), Some(max)) = (constraints.min, constraints.max) {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(SchemaError::ContradictoryBounds {
                name: name.to_owned(),
                min,
                max,
            });
        }
    }
    if let Some(step) = constraints.step {
        if !step.is_finite() || step <= 0.0 {
            return Err(SchemaError::InvalidStep {
                name: name.to_owned(),
                step,
            });
        }
    }

    let default = decl.default.ok_or_else(|| SchemaError::MissingDefault {
        name: name.to_owned(),
    })?;
    if default.kind() != kind {
        return Err(SchemaError::KindMismatch {
            name: name.to_owned(),
            declared: kind,
            found: default.kind(),
        });
    }

    let out_of_range = |value: f64, min: Option<f64>, max: Option<f64>| SchemaError::DefaultOutOfRange {
        name: name.to_owned(),
        default: value,
        min,
        max,
    };

    match default {
        SettingValue::Float(_) | SettingValue::Int(_) => {
            let value = default.as_f64().unwrap_or(f64::NAN);
            if value.is_nan() || !default_in_bounds(default, constraints) {
                return Err(out_of_range(value, constraints.min, constraints.max));
            }
            if let Some(step) = constraints.step {
                let origin = constraints.min.unwrap_or(0.0);
                let steps = (value - origin) / step;
                if (steps - steps.round()).abs() > 1e-4 {
                    log::warn!(
                        "SchemaRegistry: Default {value} of '{name}' is not a multiple of step {step}"
                    );
                }
            }
            Ok(Some(default))
        }
        SettingValue::Enum(ordinal) => {
            if decl.enum_labels.is_empty() {
                return Err(SchemaError::EmptyEnum {
                    name: name.to_owned(),
                });
            }
            let mut labels = HashSet::new();
            for label in &decl.enum_labels {
                if !labels.insert(label.as_str()) {
                    return Err(SchemaError::DuplicateName {
                        group: name.to_owned(),
                        name: label.clone(),
                    });
                }
            }
            if ordinal as usize >= decl.enum_labels.len() {
                return Err(SchemaError::EnumDefaultOutOfRange {
                    name: name.to_owned(),
                    ordinal,
                    count: decl.enum_labels.len(),
                });
            }
            Ok(Some(default))
        }
        SettingValue::Color(color) => {
            let upper = if attrs.hdr { None } else { Some(1.0) };
            for channel in color.to_rgb_array() {
                let channel = channel as f64;
                if channel.is_nan() || channel < 0.0 || upper.is_some_and(|max| channel > max) {
                    return Err(out_of_range(channel, Some(0.0), upper));
                }
            }
            Ok(Some(SettingValue::Color(LinearRgba::from_rgb_array(
                color.to_rgb_array(),
            ))))
        }
        SettingValue::Direction(direction) => {
            let length = direction.length();
            if direction.is_nan() || length <= f32::EPSILON {
                return Err(SchemaError::DegenerateDefault {
                    name: name.to_owned(),
                });
            }
            let direction = if (length - 1.0).abs() <= 1e-6 {
                direction
            } else {
                direction.normalize()
            };
            Ok(Some(SettingValue::Direction(direction)))
        }
        SettingValue::Bool(_) => Ok(Some(default)),
    }
}

/// Float defaults are compared at `f32` precision, so `min = 0.01` accepts a
/// default of `0.01_f32`.
fn default_in_bounds(default: SettingValue, constraints: &Constraints) -> bool {
    match default {
        SettingValue::Float(v) => {
            constraints.min.is_none_or(|min| v >= min as f32)
                && constraints.max.is_none_or(|max| v <= max as f32)
        }
        other => other.as_f64().is_some_and(|v| constraints.contains(v)),
    }
}
