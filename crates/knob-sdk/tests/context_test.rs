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
use knob_core::settings::{SchemaError, ValidationError};
use knob_core::SettingDescriptor;
use knob_sdk::prelude::*;
use knob_sdk::data::serialize;

#[derive(Debug, Clone, Copy, PartialEq, SettingEnum)]
enum MsaaMode {
    None,
    #[setting(label = "MSAA 2x")]
    Msaa2x,
    #[setting(label = "MSAA 4x")]
    Msaa4x,
}

#[derive(Settings)]
#[settings(display_name = "Sun and Sky")]
struct SunAndSky {
    enable_sun: bool,
    /// Angular size of the sun disc.
    #[setting(min = 0.01, max = 10.0, step = 0.01)]
    sun_size: f32,
    #[setting(view_space)]
    sun_direction: Direction,
    #[setting(hdr)]
    sun_tint: Color,
    #[setting(min = 1.0, max = 10.0, shader_constant = false)]
    turbidity: f32,
}

impl Default for SunAndSky {
    fn default() -> Self {
        Self {
            enable_sun: true,
            sun_size: 1.0,
            sun_direction: Vec3::new(0.0, 1.0, 0.0),
            sun_tint: LinearRgba::rgb(1.0, 0.9, 0.8),
            turbidity: 2.0,
        }
    }
}

#[derive(Settings)]
#[settings(expand = false)]
struct PostProcessing {
    #[setting(min = -24.0, max = 24.0, step = 0.1, help = "Exposure in EV")]
    exposure: f32,
    #[setting(min = 1, max = 10)]
    bloom_passes: i32,
    msaa: MsaaMode,
    #[setting(min = 0, max = 180, convert = "degrees_to_radians")]
    fov: f32,
    reset_exposure: Button,
}

impl Default for PostProcessing {
    fn default() -> Self {
        Self {
            exposure: -14.0,
            bloom_passes: 4,
            msaa: MsaaMode::Msaa4x,
            fov: 60.0,
            reset_exposure: Button,
        }
    }
}

#[derive(Settings, Default)]
struct AppSettings {
    sun_and_sky: SunAndSky,
    post_processing: PostProcessing,
    #[setting(hidden)]
    debug_overlay: bool,
}

fn context() -> SettingsContext {
    SettingsContext::from_settings::<AppSettings>().unwrap()
}

#[test]
fn test_derived_schema_compiles_to_registry() {
    let context = context();
    let registry = context.registry();
    assert_eq!(registry.name(), "AppSettings");

    let sun_size = registry.find("sun_and_sky.sun_size").unwrap();
    assert_eq!(sun_size.help, "Angular size of the sun disc.");
    assert_eq!(sun_size.label, "Sun Size");
    assert_eq!(registry.find("sun_and_sky").map(|d| d.id), None);
    assert!(!registry.find("sun_and_sky.turbidity").unwrap().shader_visible);
    assert!(!registry.find("debug_overlay").unwrap().visible);

    let msaa: &SettingDescriptor = registry.find("post_processing.msaa").unwrap();
    assert_eq!(msaa.enum_labels, ["None", "MSAA 2x", "MSAA 4x"]);
    assert_eq!(context.enum_as::<MsaaMode>("post_processing.msaa"), Some(MsaaMode::Msaa4x));

    let post = registry.root().find_group("post_processing").unwrap();
    assert!(!post.expanded);
    assert_eq!(registry.root().find_group("sun_and_sky").unwrap().label, "Sun and Sky");
}

#[test]
fn test_propose_clamps_and_snapshot_reads_back() {
    // --- 1. ARRANGE ---
    let mut context = context();

    // --- 2. ACT ---
    let accepted = context.propose("post_processing.bloom_passes", 15).unwrap();
    context.propose("post_processing.exposure", 2.5f32).unwrap();
    context
        .propose("sun_and_sky.sun_direction", Vec3::new(3.0, 0.0, 4.0))
        .unwrap();

    // --- 3. ASSERT ---
    assert!(accepted.adjusted);
    assert_eq!(context.int("post_processing.bloom_passes"), Some(10));

    let snapshot: AppSettings = context.snapshot();
    assert_eq!(snapshot.post_processing.bloom_passes, 10);
    assert_relative_eq!(snapshot.post_processing.exposure, 2.5, epsilon = 1e-5);
    assert_relative_eq!(snapshot.sun_and_sky.sun_direction.x, 0.6, epsilon = 1e-6);
    assert_relative_eq!(snapshot.sun_and_sky.sun_direction.z, 0.8, epsilon = 1e-6);
    assert!(!snapshot.debug_overlay);
}

#[test]
fn test_propose_errors() {
    let mut context = context();
    assert!(matches!(
        context.propose("post_processing.nope", 1.0f32),
        Err(ValidationError::UnknownSetting { .. })
    ));
    assert!(matches!(
        context.propose("sun_and_sky.enable_sun", 1.0f32),
        Err(ValidationError::TypeMismatch { .. })
    ));
    assert!(matches!(
        context.propose("post_processing.msaa", SettingValue::Enum(7)),
        Err(ValidationError::InvalidEnumValue { ordinal: 7, count: 3, .. })
    ));
    assert!(matches!(
        context.invoke("sun_and_sky.sun_size"),
        Err(ValidationError::TypeMismatch { .. })
    ));
}

#[test]
fn test_frames_publish_packed_values() {
    // --- 1. ARRANGE ---
    let mut context = context();
    let fov = context
        .layout()
        .entries()
        .iter()
        .find(|e| e.name == "post_processing.fov")
        .cloned()
        .unwrap();

    // --- 2. ACT ---
    let first = context.prepare_frame().to_vec();
    context.propose("post_processing.fov", 90.0f32).unwrap();
    let second = context.prepare_frame().to_vec();

    // --- 3. ASSERT ---
    assert_eq!(first.len(), context.layout().size() as usize);
    let read = |bytes: &[u8]| {
        f32::from_ne_bytes(bytes[fov.range()][..4].try_into().unwrap())
    };
    assert_relative_eq!(read(&first), std::f32::consts::FRAC_PI_3, epsilon = 1e-6);
    assert_relative_eq!(read(&second), std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
    assert_eq!(second, serialize(context.layout(), context.store()));
    assert_eq!(context.front_buffer(), second.as_slice());
}

#[test]
fn test_layout_offsets() {
    let context = context();
    let offsets: Vec<(&str, u32)> = context
        .layout()
        .entries()
        .iter()
        .map(|e| (e.name.as_str(), e.offset))
        .collect();
    assert_eq!(
        offsets,
        [
            ("sun_and_sky.enable_sun", 0),
            ("sun_and_sky.sun_size", 4),
            ("sun_and_sky.sun_direction", 16),
            ("sun_and_sky.sun_tint", 32),
            ("post_processing.exposure", 48),
            ("post_processing.bloom_passes", 52),
            ("post_processing.msaa", 56),
            ("post_processing.fov", 60),
            ("debug_overlay", 64),
        ]
    );
    assert_eq!(context.layout().size(), 80);
}

#[test]
fn test_button_fires_once_per_frame() {
    let mut context = context();
    context.invoke("post_processing.reset_exposure").unwrap();
    context.invoke("post_processing.reset_exposure").unwrap();

    assert!(context.pressed("post_processing.reset_exposure"));
    assert!(!context.pressed("post_processing.reset_exposure"));

    context.invoke("post_processing.reset_exposure").unwrap();
    context.end_frame();
    assert!(!context.pressed("post_processing.reset_exposure"));
}

#[test]
fn test_changed_lasts_until_end_frame() {
    let mut context = context();
    assert!(!context.changed("post_processing.exposure"));

    context.propose("post_processing.exposure", -10.0f32).unwrap();
    assert!(context.changed("post_processing.exposure"));
    context.prepare_frame();
    assert!(context.changed("post_processing.exposure"));

    context.end_frame();
    assert!(!context.changed("post_processing.exposure"));

    context.propose("post_processing.exposure", -10.0f32).unwrap();
    assert!(!context.changed("post_processing.exposure"), "same value is not a change");
}

#[test]
fn test_restrict_enum_and_visibility() {
    let mut context = context();
    context.restrict_enum("post_processing.msaa", Some(1)).unwrap();
    assert_eq!(context.enum_value("post_processing.msaa"), Some(1));

    context.propose("post_processing.msaa", SettingValue::Enum(2)).unwrap();
    assert_eq!(context.enum_value("post_processing.msaa"), Some(1));

    context.restrict_enum("post_processing.msaa", None).unwrap();
    context.propose("post_processing.msaa", SettingValue::Enum(2)).unwrap();
    assert_eq!(context.enum_value("post_processing.msaa"), Some(2));

    assert!(context.restrict_enum("sun_and_sky.sun_size", Some(1)).is_err());
    assert!(context.set_visible("nope", true).is_err());
    context.set_visible("debug_overlay", true).unwrap();
    let id = context.registry().lookup("debug_overlay").unwrap();
    assert!(context.store().is_visible(id));
}

struct ClickEverything;

impl UiBackend for ClickEverything {
    fn group(&mut self, _: &str, _: bool, contents: &mut dyn FnMut(&mut dyn UiBackend)) {
        contents(self);
    }
    fn toggle(&mut self, _: &SettingDescriptor, _: bool) -> Option<bool> {
        None
    }
    fn slider_f32(&mut self, _: &SettingDescriptor, _: f32) -> Option<f32> {
        None
    }
    fn slider_i32(&mut self, _: &SettingDescriptor, _: i32) -> Option<i32> {
        None
    }
    fn dropdown(&mut self, _: &SettingDescriptor, _: u32, _: &[String]) -> Option<u32> {
        None
    }
    fn color(&mut self, _: &SettingDescriptor, _: LinearRgba) -> Option<LinearRgba> {
        None
    }
    fn direction(&mut self, _: &SettingDescriptor, _: Vec3) -> Option<Vec3> {
        None
    }
    fn button(&mut self, _: &SettingDescriptor) -> bool {
        true
    }
}

#[test]
fn test_render_ui_raises_button_signals() {
    let mut context = context();
    let events = context.render_ui(&mut ClickEverything);
    assert_eq!(events.len(), 1);
    assert!(context.pressed("post_processing.reset_exposure"));
}

#[test]
fn test_preset_round_trip_through_files() {
    // --- 1. ARRANGE ---
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.preset");
    let mut source = context();
    source.propose("post_processing.exposure", 3.2f32).unwrap();
    source.propose("post_processing.msaa", SettingValue::Enum(0)).unwrap();
    source
        .propose("sun_and_sky.sun_tint", LinearRgba::rgb(4.0, 2.0, 0.5))
        .unwrap();

    // --- 2. ACT ---
    source.save_to(&path).unwrap();
    let mut target = context();
    target.prepare_frame();
    let issues = target.load_from(&path).unwrap();

    // --- 3. ASSERT ---
    assert!(issues.is_empty());
    assert_eq!(target.store().values(), source.store().values());
    assert!(target.store().has_dirty(), "applied values are packed next frame");
    assert_eq!(target.color("sun_and_sky.sun_tint"), Some(LinearRgba::rgb(4.0, 2.0, 0.5)));
}

#[test]
fn test_autosave_on_drop_and_load_on_start() {
    let dir = tempfile::tempdir().unwrap();
    let config = KnobConfig {
        preset_path: Some(dir.path().join("auto.preset")),
        autosave: true,
        ..KnobConfig::default()
    };
    let schema = <AppSettings as Settings>::schema();

    {
        let mut context = SettingsContext::with_config(&schema, config.clone()).unwrap();
        context.propose("post_processing.bloom_passes", 7).unwrap();
    }

    let context = SettingsContext::with_config(&schema, config).unwrap();
    assert_eq!(context.int("post_processing.bloom_passes"), Some(7));
}

#[test]
fn test_shader_header_uses_configured_binding() {
    let context = context();
    let hlsl = context.shader_header(ShaderLanguage::Hlsl);
    assert!(hlsl.contains("cbuffer AppSettings : register(b12)"));
    assert!(hlsl.contains("float fov; // offset 60"));
    assert!(!hlsl.contains("turbidity"));
}

#[test]
fn test_default_shader_header_follows_config() {
    let config = KnobConfig {
        shader_language: ShaderLanguage::Wgsl,
        cbuffer_register: 3,
        ..KnobConfig::default()
    };
    let context = SettingsContext::with_config(&<AppSettings as Settings>::schema(), config).unwrap();

    let header = context.default_shader_header();
    assert_eq!(header, context.shader_header(ShaderLanguage::Wgsl));
    assert!(header.contains("@group(0) @binding(3) var<uniform> settings: AppSettings;"));
}

#[derive(Settings)]
struct Broken {
    #[setting(min = 5.0, max = 1.0)]
    value: f32,
}

impl Default for Broken {
    fn default() -> Self {
        Self { value: 3.0 }
    }
}

#[test]
fn test_invalid_schema_is_rejected() {
    assert!(matches!(
        SettingsContext::from_settings::<Broken>(),
        Err(SchemaError::ContradictoryBounds { .. })
    ));
}
