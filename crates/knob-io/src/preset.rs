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

//! Saving and loading presets.

use crate::error::PersistenceError;
use knob_core::math::{LinearRgba, Vec3};
use knob_core::settings::{SettingDescriptor, SettingKind, SettingValue};
use knob_data::{SchemaRegistry, ValueStore};
use std::collections::HashMap;
use std::path::Path;

/// The result of reading a preset.
///
/// Loading never fails as a whole: every record that could not be used is
/// reported in `issues` and leaves its setting at the default.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Defaults overlaid with every accepted record.
    pub store: ValueStore,
    /// Per-record problems, in line order.
    pub issues: Vec<PersistenceError>,
}

impl LoadOutcome {
    /// Returns `true` if every record was used as written.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Renders every non-button value of `store` as preset text.
///
/// # Errors
///
/// Returns [`PersistenceError::Encode`] if a value cannot be written as RON.
pub fn save(registry: &SchemaRegistry, store: &ValueStore) -> Result<String, PersistenceError> {
    let mut out = format!("# Knob preset for '{}'\n", registry.name());
    let mut current_group: Option<&str> = None;

    for descriptor in registry.iter() {
        let Some(value) = store.get(descriptor.id) else {
            continue;
        };

        if current_group != Some(descriptor.group_path.as_str()) {
            current_group = Some(descriptor.group_path.as_str());
            if let Some(group) = registry.root().find_group(&descriptor.group_path) {
                if !group.path.is_empty() {
                    out.push_str(&format!("\n# {}\n", group.label));
                }
            }
        }

        let text = encode_value(descriptor, value).map_err(|source| PersistenceError::Encode {
            name: descriptor.qualified_name.clone(),
            source,
        })?;
        out.push_str(&descriptor.qualified_name);
        out.push_str(" = ");
        out.push_str(&text);
        out.push('\n');
    }
    Ok(out)
}

fn encode_value(descriptor: &SettingDescriptor, value: SettingValue) -> Result<String, ron::Error> {
    match value {
        SettingValue::Bool(v) => ron::to_string(&v),
        SettingValue::Float(v) => ron::to_string(&v),
        SettingValue::Int(v) => ron::to_string(&v),
        SettingValue::Enum(ordinal) => match descriptor.enum_label(ordinal) {
            Some(label) => ron::to_string(label),
            None => ron::to_string(&ordinal),
        },
        SettingValue::Color(c) => ron::to_string(&(c.r, c.g, c.b)),
        SettingValue::Direction(d) => ron::to_string(&(d.x, d.y, d.z)),
    }
}

/// Parses preset text against `registry`.
///
/// Blank lines and `#` comments are skipped. Unknown keys, malformed lines and
/// rejected values are reported and skipped; out-of-range values are clamped
/// through the validation rules and reported as
/// [`Adjusted`](PersistenceError::Adjusted).
pub fn load(text: &str, registry: &SchemaRegistry) -> LoadOutcome {
    let mut store = ValueStore::from_defaults(registry);
    let mut issues = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value_text)) = trimmed.split_once('=') else {
            issues.push(PersistenceError::Malformed {
                line,
                text: trimmed.to_owned(),
            });
            continue;
        };
        let (key, value_text) = (key.trim(), value_text.trim());
        if key.is_empty() || value_text.is_empty() {
            issues.push(PersistenceError::Malformed {
                line,
                text: trimmed.to_owned(),
            });
            continue;
        }

        let Some(descriptor) = registry.find(key) else {
            issues.push(PersistenceError::UnknownKey {
                line,
                name: key.to_owned(),
            });
            continue;
        };
        let name = descriptor.qualified_name.clone();

        if let Some(first) = seen.insert(key, line) {
            issues.push(PersistenceError::DuplicateKey {
                line,
                first,
                name: name.clone(),
            });
        }

        let invalid = |reason: String| PersistenceError::InvalidValue {
            line,
            name: name.clone(),
            reason,
        };

        let raw = match decode_value(descriptor, value_text) {
            Ok(raw) => raw,
            Err(reason) => {
                issues.push(invalid(reason));
                store.reset(registry, descriptor.id);
                continue;
            }
        };

        match store.propose(registry, descriptor.id, raw) {
            Ok(accepted) if accepted.adjusted => {
                issues.push(PersistenceError::Adjusted { line, name });
            }
            Ok(_) => {}
            Err(err) => {
                issues.push(invalid(err.to_string()));
                store.reset(registry, descriptor.id);
            }
        }
    }

    for issue in &issues {
        log::warn!("Preset: {issue}");
    }

    // A freshly loaded store has nothing pending; the packer does a full write anyway.
    store.clear_changed();
    store.clear_dirty();

    LoadOutcome { store, issues }
}

/// Turns the text of one record into a raw value of the setting's kind.
fn decode_value(descriptor: &SettingDescriptor, text: &str) -> Result<SettingValue, String> {
    match descriptor.kind {
        SettingKind::Button => Err("buttons have no value".to_owned()),
        SettingKind::Bool => ron::from_str::<bool>(text)
            .map(SettingValue::Bool)
            .map_err(|e| e.to_string()),
        SettingKind::Float => decode_number(text).map(|n| match n {
            Number::Int(v) => SettingValue::Int(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32),
            Number::Float(v) => SettingValue::Float(v as f32),
        }),
        SettingKind::Int => decode_number(text).map(|n| match n {
            Number::Int(v) => SettingValue::Int(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32),
            Number::Float(v) => SettingValue::Float(v as f32),
        }),
        SettingKind::Enum => {
            if let Ok(label) = ron::from_str::<String>(text) {
                return descriptor
                    .enum_ordinal(&label)
                    .map(SettingValue::Enum)
                    .ok_or_else(|| format!("no value labelled '{label}'"));
            }
            if let Some(ordinal) = descriptor.enum_ordinal(text) {
                return Ok(SettingValue::Enum(ordinal));
            }
            // Out-of-range ordinals are left to validation.
            match ron::from_str::<i64>(text) {
                Ok(v) => Ok(SettingValue::Int(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)),
                Err(e) => Err(e.to_string()),
            }
        }
        SettingKind::Color => decode_triple(text)
            .map(|[r, g, b]| SettingValue::Color(LinearRgba::rgb(r, g, b))),
        SettingKind::Direction => decode_triple(text)
            .map(|[x, y, z]| SettingValue::Direction(Vec3::new(x, y, z))),
    }
}

enum Number {
    Int(i64),
    Float(f64),
}

fn decode_number(text: &str) -> Result<Number, String> {
    if let Ok(v) = ron::from_str::<i64>(text) {
        return Ok(Number::Int(v));
    }
    ron::from_str::<f64>(text)
        .map(Number::Float)
        .map_err(|e| e.to_string())
}

fn decode_triple(text: &str) -> Result<[f32; 3], String> {
    ron::from_str::<(f32, f32, f32)>(text)
        .map(|(a, b, c)| [a, b, c])
        .map_err(|e| e.to_string())
}

/// Loads `text` into a live store.
///
/// Every value goes through [`ValueStore::propose`], so changed settings are
/// flagged and their packed slots marked dirty. Runtime enum limits of `store`
/// still apply. Settings the preset does not mention return to their defaults.
pub fn apply(
    text: &str,
    registry: &SchemaRegistry,
    store: &mut ValueStore,
) -> Vec<PersistenceError> {
    let outcome = load(text, registry);
    for descriptor in registry.iter() {
        let Some(value) = outcome.store.get(descriptor.id) else {
            continue;
        };
        if let Err(err) = store.propose(registry, descriptor.id, value) {
            log::warn!("Preset: could not apply '{}': {err}", descriptor.qualified_name);
        }
    }
    outcome.issues
}

/// Writes [`save`] output to `path`.
///
/// # Errors
///
/// Returns [`PersistenceError::Io`] if the file cannot be written.
pub fn save_to_path(
    path: &Path,
    registry: &SchemaRegistry,
    store: &ValueStore,
) -> Result<(), PersistenceError> {
    let text = save(registry, store)?;
    std::fs::write(path, text).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Preset: Saved '{}' to {}", registry.name(), path.display());
    Ok(())
}

/// Reads `path` and [`load`]s it.
///
/// # Errors
///
/// Returns [`PersistenceError::Io`] if the file cannot be read.
pub fn load_from_path(path: &Path, registry: &SchemaRegistry) -> Result<LoadOutcome, PersistenceError> {
    let text = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let outcome = load(&text, registry);
    log::info!(
        "Preset: Loaded '{}' from {} ({} issue(s))",
        registry.name(),
        path.display(),
        outcome.issues.len()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knob_core::settings::{GroupDecl, SchemaDecl, SettingAttributes, SettingDecl};

    fn registry() -> SchemaRegistry {
        let attrs = SettingAttributes::new;
        SchemaRegistry::build(&SchemaDecl::new(
            "Test",
            GroupDecl::new("Test")
                .group(
                    GroupDecl::new("post_processing")
                        .setting(SettingDecl::float("exposure", -14.0, attrs().min(-24.0).max(24.0)))
                        .setting(SettingDecl::int("samples", 4, attrs().min(1.0).max(10.0))),
                )
                .setting(SettingDecl::enumeration("msaa", 0, ["None", "2x", "4x"], attrs()))
                .setting(SettingDecl::color("albedo", LinearRgba::rgb(0.25, 0.25, 0.25), attrs()))
                .setting(SettingDecl::button("clear", attrs())),
        ))
        .unwrap()
    }

    #[test]
    fn test_save_format() {
        let registry = registry();
        let store = ValueStore::from_defaults(&registry);
        let text = save(&registry, &store).unwrap();

        assert!(text.starts_with("# Knob preset for 'Test'\n"));
        assert!(text.contains("\n# Post Processing\n"));
        assert!(text.contains("post_processing.exposure = -14.0\n"));
        assert!(text.contains("post_processing.samples = 4\n"));
        assert!(text.contains("msaa = \"None\"\n"));
        assert!(text.contains("albedo = (0.25,0.25,0.25)\n"));
        assert!(!text.contains("clear"), "buttons are never written");
    }

    #[test]
    fn test_load_accepts_ordinals_and_bare_labels() {
        let registry = registry();
        let msaa = registry.lookup("msaa").unwrap();

        let by_ordinal = load("msaa = 2", &registry);
        assert_eq!(by_ordinal.store.get(msaa), Some(SettingValue::Enum(2)));
        assert!(by_ordinal.is_clean());

        let bare = load("msaa = 2x", &registry);
        assert_eq!(bare.store.get(msaa), Some(SettingValue::Enum(1)));
    }

    #[test]
    fn test_load_clamps_out_of_range() {
        let registry = registry();
        let outcome = load("post_processing.samples = 15", &registry);
        let id = registry.lookup("post_processing.samples").unwrap();
        assert_eq!(outcome.store.get(id), Some(SettingValue::Int(10)));
        assert!(matches!(
            outcome.issues.as_slice(),
            [PersistenceError::Adjusted { line: 1, .. }]
        ));
    }

    #[test]
    fn test_rejected_value_keeps_default() {
        let registry = registry();
        let outcome = load(
            "msaa = \"8x\"\npost_processing.exposure = nope\nclear = true",
            &registry,
        );
        let defaults = ValueStore::from_defaults(&registry);
        assert_eq!(outcome.store.values(), defaults.values());
        assert_eq!(outcome.issues.len(), 3);
        assert!(outcome
            .issues
            .iter()
            .all(|issue| matches!(issue, PersistenceError::InvalidValue { .. })));
    }

    #[test]
    fn test_duplicate_key_later_wins() {
        let registry = registry();
        let outcome = load(
            "post_processing.samples = 2\npost_processing.samples = 3",
            &registry,
        );
        let id = registry.lookup("post_processing.samples").unwrap();
        assert_eq!(outcome.store.get(id), Some(SettingValue::Int(3)));
        assert!(matches!(
            outcome.issues.as_slice(),
            [PersistenceError::DuplicateKey { line: 2, first: 1, .. }]
        ));
    }
}
