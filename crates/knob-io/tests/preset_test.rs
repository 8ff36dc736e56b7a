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

use approx::assert_relative_eq;
use knob_core::math::{LinearRgba, Vec3};
use knob_core::settings::{GroupDecl, SchemaDecl, SettingAttributes, SettingDecl, SettingValue};
use knob_data::{SchemaRegistry, ValueStore};
use knob_io::{apply, load, load_from_path, save, save_to_path, PersistenceError};

fn registry() -> SchemaRegistry {
    let attrs = SettingAttributes::new;
    SchemaRegistry::build(&SchemaDecl::new(
        "Renderer",
        GroupDecl::new("Renderer")
            .group(
                GroupDecl::new("sky")
                    .setting(SettingDecl::boolean("enable_sun", true, attrs()))
                    .setting(SettingDecl::float(
                        "sun_size",
                        1.0,
                        attrs().min(0.01).max(10.0).step(0.01),
                    ))
                    .setting(SettingDecl::direction("sun_direction", Vec3::Y, attrs()))
                    .setting(SettingDecl::color(
                        "ground_albedo",
                        LinearRgba::rgb(0.25, 0.25, 0.25),
                        attrs(),
                    )),
            )
            .group(
                GroupDecl::new("post_processing")
                    .setting(SettingDecl::float(
                        "exposure",
                        -14.0,
                        attrs().min(-24.0).max(24.0).step(0.1),
                    ))
                    .setting(SettingDecl::int("bloom_passes", 4, attrs().min(1.0).max(8.0)))
                    .setting(SettingDecl::button("reset_exposure", attrs())),
            )
            .setting(SettingDecl::enumeration(
                "msaa_mode",
                0,
                ["None", "MSAA 2x", "MSAA 4x"],
                attrs(),
            )),
    ))
    .unwrap()
}

#[test]
fn test_save_then_load_restores_every_value() {
    // --- 1. ARRANGE ---
    let registry = registry();
    let mut store = ValueStore::from_defaults(&registry);
    store
        .propose_by_name(&registry, "sky.enable_sun", SettingValue::Bool(false))
        .unwrap();
    store
        .propose_by_name(&registry, "sky.sun_size", SettingValue::Float(2.37))
        .unwrap();
    store
        .propose_by_name(
            &registry,
            "sky.sun_direction",
            SettingValue::Direction(Vec3::new(0.0, 3.0, 4.0)),
        )
        .unwrap();
    store
        .propose_by_name(
            &registry,
            "sky.ground_albedo",
            SettingValue::Color(LinearRgba::rgb(0.1, 0.2, 0.3)),
        )
        .unwrap();
    store
        .propose_by_name(&registry, "post_processing.bloom_passes", SettingValue::Int(6))
        .unwrap();
    store
        .propose_by_name(&registry, "msaa_mode", SettingValue::Enum(2))
        .unwrap();

    // --- 2. ACT ---
    let text = save(&registry, &store).unwrap();
    let outcome = load(&text, &registry);

    // --- 3. ASSERT ---
    assert!(outcome.is_clean(), "unexpected issues: {:?}", outcome.issues);
    assert_eq!(outcome.store.values(), store.values());
    assert!(text.contains("msaa_mode = \"MSAA 4x\""));
    assert!(!text.contains("reset_exposure"));
}

#[test]
fn test_file_round_trip() {
    let registry = registry();
    let mut store = ValueStore::from_defaults(&registry);
    store
        .propose_by_name(&registry, "post_processing.exposure", SettingValue::Float(-9.5))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("renderer.preset");
    save_to_path(&path, &registry, &store).unwrap();
    let outcome = load_from_path(&path, &registry).unwrap();

    let id = registry.lookup("post_processing.exposure").unwrap();
    let exposure = outcome.store.get(id).and_then(|v| v.as_float()).unwrap();
    assert_relative_eq!(exposure, -9.5);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let registry = registry();
    let dir = tempfile::tempdir().unwrap();
    let result = load_from_path(&dir.path().join("absent.preset"), &registry);
    assert!(matches!(result, Err(PersistenceError::Io { .. })));
}

#[test]
fn test_bad_records_are_reported_and_skipped() {
    // --- 1. ARRANGE ---
    let registry = registry();
    let text = "\
# hand-edited
sky.enable_sun = false
this line has no separator
sky.moon_size = 3.0
post_processing.bloom_passes = 40
sky.sun_size = 0.333
";

    // --- 2. ACT ---
    let outcome = load(text, &registry);

    // --- 3. ASSERT ---
    let store = &outcome.store;
    assert_eq!(
        store.get(registry.lookup("sky.enable_sun").unwrap()),
        Some(SettingValue::Bool(false))
    );
    assert_eq!(
        store.get(registry.lookup("post_processing.bloom_passes").unwrap()),
        Some(SettingValue::Int(8))
    );
    let sun_size = store
        .get(registry.lookup("sky.sun_size").unwrap())
        .and_then(|v| v.as_float())
        .unwrap();
    assert_relative_eq!(sun_size, 0.33, epsilon = 1e-6);

    assert_eq!(outcome.issues.len(), 4);
    assert!(matches!(outcome.issues[0], PersistenceError::Malformed { line: 3, .. }));
    assert!(
        matches!(&outcome.issues[1], PersistenceError::UnknownKey { line: 4, name } if name == "sky.moon_size")
    );
    assert!(matches!(outcome.issues[2], PersistenceError::Adjusted { line: 5, .. }));
    assert!(matches!(outcome.issues[3], PersistenceError::Adjusted { line: 6, .. }));
}

#[test]
fn test_loaded_store_has_no_pending_flags() {
    let registry = registry();
    let outcome = load("sky.enable_sun = false", &registry);
    assert!(!outcome.store.has_dirty());
    assert!(!outcome.store.any_changed());
}

#[test]
fn test_apply_marks_live_store_dirty() {
    // --- 1. ARRANGE ---
    let registry = registry();
    let mut live = ValueStore::from_defaults(&registry);
    live.clear_dirty();
    live.clear_changed();

    // --- 2. ACT ---
    let issues = apply("msaa_mode = \"MSAA 2x\"\nsky.moon = 1", &registry, &mut live);

    // --- 3. ASSERT ---
    assert_eq!(issues.len(), 1);
    let msaa = registry.lookup("msaa_mode").unwrap();
    assert_eq!(live.get(msaa), Some(SettingValue::Enum(1)));
    assert!(live.is_dirty(msaa));
    assert!(live.changed(msaa));
    assert_eq!(live.dirty_ids().count(), 1);
}

#[test]
fn test_apply_respects_enum_limit() {
    let registry = registry();
    let msaa = registry.lookup("msaa_mode").unwrap();
    let mut live = ValueStore::from_defaults(&registry);
    live.set_enum_limit(&registry, msaa, Some(1)).unwrap();

    apply("msaa_mode = 2", &registry, &mut live);
    assert_eq!(live.get(msaa), Some(SettingValue::Enum(1)));
}
