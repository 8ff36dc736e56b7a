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
use knob_core::settings::{
    ConversionMode, GroupDecl, SchemaDecl, SettingAttributes, SettingDecl, SettingValue,
};
use knob_data::{
    serialize, ConstantBufferWriter, FrameBuffers, PackedLayout, SchemaRegistry, ValueStore,
};

// --- FIXTURE: a renderer-sized schema mixing every packed kind ---
fn schema() -> SchemaDecl {
    let attrs = SettingAttributes::new;
    SchemaDecl::new(
        "Renderer",
        GroupDecl::new("Renderer")
            .group(
                GroupDecl::new("sky")
                    .setting(SettingDecl::boolean("enable_sun", true, attrs()))
                    .setting(SettingDecl::boolean("area_light", true, attrs()))
                    .setting(SettingDecl::float(
                        "sun_size",
                        1.0,
                        attrs().min(0.01).max(10.0).step(0.01),
                    ))
                    .setting(SettingDecl::direction(
                        "sun_direction",
                        Vec3::new(0.26, 0.987, -0.16),
                        attrs().view_space(true),
                    ))
                    .setting(SettingDecl::float(
                        "turbidity",
                        2.0,
                        attrs().min(1.0).max(10.0).shader_constant(false),
                    ))
                    .setting(SettingDecl::color(
                        "ground_albedo",
                        LinearRgba::rgb(0.25, 0.25, 0.25),
                        attrs().shader_constant(false),
                    )),
            )
            .group(
                GroupDecl::new("post")
                    .setting(SettingDecl::float(
                        "exposure",
                        -14.0,
                        attrs().min(-24.0).max(24.0).step(0.1),
                    ))
                    .setting(SettingDecl::float(
                        "cone_angle",
                        45.0,
                        attrs()
                            .min(0.0)
                            .max(90.0)
                            .conversion(ConversionMode::DegreesToRadians),
                    ))
                    .setting(SettingDecl::color(
                        "tint",
                        LinearRgba::rgb(1.0, 0.9, 0.8),
                        attrs().hdr(true),
                    ))
                    .setting(SettingDecl::int("max_lights", 32, attrs().min(0.0).max(32.0))),
            )
            .setting(SettingDecl::enumeration("msaa", 1, ["None", "2x", "4x"], attrs()))
            .setting(SettingDecl::button("clear_decals", attrs())),
    )
}

#[test]
fn test_layout_is_reproducible_across_builds() {
    // --- 1. ARRANGE ---
    let a = SchemaRegistry::build(&schema()).unwrap();
    let b = SchemaRegistry::build(&schema()).unwrap();

    // --- 2. ACT ---
    let layout_a = PackedLayout::build(&a);
    let layout_b = PackedLayout::build(&b);

    // --- 3. ASSERT ---
    assert_eq!(layout_a, layout_b);
    let names: Vec<&str> = layout_a.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "sky.enable_sun",
            "sky.area_light",
            "sky.sun_size",
            "sky.sun_direction",
            "post.exposure",
            "post.cone_angle",
            "post.tint",
            "post.max_lights",
            "msaa",
        ],
        "shader-visible settings keep declaration order and skip excluded ones"
    );
    let offsets: Vec<u32> = layout_a.entries().iter().map(|e| e.offset).collect();
    assert_eq!(offsets, [0, 4, 8, 16, 32, 36, 48, 64, 68]);
    assert_eq!(layout_a.size(), 80);
}

#[test]
fn test_incremental_updates_track_full_serialization() {
    // --- 1. ARRANGE ---
    let registry = SchemaRegistry::build(&schema()).unwrap();
    let layout = PackedLayout::build(&registry);
    let mut store = ValueStore::from_defaults(&registry);
    let mut writer = ConstantBufferWriter::new(&layout);
    let mut frames = FrameBuffers::new(layout.size() as usize);

    let edits = [
        ("post.exposure", SettingValue::Float(3.33)),
        ("sky.enable_sun", SettingValue::Bool(false)),
        ("post.tint", SettingValue::Color(LinearRgba::rgb(4.0, -1.0, 0.5))),
        ("sky.sun_direction", SettingValue::Direction(Vec3::new(1.0, 1.0, 0.0))),
        ("msaa", SettingValue::Enum(2)),
        ("post.max_lights", SettingValue::Int(99)),
        ("sky.turbidity", SettingValue::Float(5.0)),
    ];

    // --- 2. ACT & 3. ASSERT (one frame per edit) ---
    writer.update(&layout, &mut store);
    frames.publish(writer.bytes());
    for (name, value) in edits {
        store.propose_by_name(&registry, name, value).unwrap();
        writer.update(&layout, &mut store);
        frames.publish(writer.bytes());

        assert_eq!(
            frames.front(),
            serialize(&layout, &store).as_slice(),
            "front buffer diverged after editing {name}"
        );
    }
}

#[test]
fn test_conversion_applies_only_at_pack_time() {
    let registry = SchemaRegistry::build(&schema()).unwrap();
    let layout = PackedLayout::build(&registry);
    let store = ValueStore::from_defaults(&registry);

    let id = registry.lookup("post.cone_angle").unwrap();
    assert_eq!(store.get(id), Some(SettingValue::Float(45.0)));

    let entry = layout.entry(id).unwrap();
    let bytes = serialize(&layout, &store);
    let packed: f32 = bytemuck::pod_read_unaligned(&bytes[entry.range()]);
    assert_relative_eq!(packed, std::f32::consts::FRAC_PI_4, epsilon = 1e-6);
}
