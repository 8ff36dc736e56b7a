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

//! Generates shader-side declarations matching a [`PackedLayout`].
//!
//! Padding is spelled out as explicit members so the shader compiler's own
//! packing rules can never move a field away from the offset the writer uses.

use super::layout::{PackedLayout, PackedType};
use crate::registry::SchemaRegistry;
use knob_core::settings::ConstantValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;

/// Target shading language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderLanguage {
    /// A `cbuffer` block for HLSL.
    #[default]
    Hlsl,
    /// A `struct` plus a uniform binding for WGSL.
    Wgsl,
}

impl PackedType {
    fn shader_type(self, language: ShaderLanguage) -> &'static str {
        match (language, self) {
            (ShaderLanguage::Hlsl, PackedType::Bool) => "bool",
            (ShaderLanguage::Hlsl, PackedType::Float) => "float",
            (ShaderLanguage::Hlsl, PackedType::Int) => "int",
            (ShaderLanguage::Hlsl, PackedType::Enum) => "uint",
            (ShaderLanguage::Hlsl, PackedType::Color | PackedType::Direction) => "float3",
            (ShaderLanguage::Wgsl, PackedType::Bool | PackedType::Enum) => "u32",
            (ShaderLanguage::Wgsl, PackedType::Float) => "f32",
            (ShaderLanguage::Wgsl, PackedType::Int) => "i32",
            (ShaderLanguage::Wgsl, PackedType::Color | PackedType::Direction) => "vec3<f32>",
        }
    }
}

/// Shader header emitter.
pub struct ShaderHeader;

impl ShaderHeader {
    /// Renders the constants of `registry` and a buffer declaration named
    /// `name` bound at `register`.
    pub fn emit(
        language: ShaderLanguage,
        name: &str,
        register: u32,
        layout: &PackedLayout,
        registry: &SchemaRegistry,
    ) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "// Generated from settings schema '{}'. Do not edit.",
            registry.name()
        );
        out.push('\n');

        emit_constants(&mut out, language, registry);
        if !registry.constants().is_empty() {
            out.push('\n');
        }

        let members = members(layout);
        match language {
            ShaderLanguage::Hlsl => {
                let _ = writeln!(out, "cbuffer {name} : register(b{register})\n{{");
                for member in &members {
                    let _ = writeln!(
                        out,
                        "    {} {}; // offset {}",
                        member.ty_name(language),
                        member.name,
                        member.offset
                    );
                }
                out.push_str("};\n");
            }
            ShaderLanguage::Wgsl => {
                let _ = writeln!(out, "struct {name} {{");
                for member in &members {
                    let _ = writeln!(
                        out,
                        "    {}: {}, // offset {}",
                        member.name,
                        member.ty_name(language),
                        member.offset
                    );
                }
                out.push_str("};\n\n");
                let _ = writeln!(
                    out,
                    "@group(0) @binding({register}) var<uniform> settings: {name};"
                );
            }
        }
        out
    }
}

fn emit_constants(out: &mut String, language: ShaderLanguage, registry: &SchemaRegistry) {
    for constant in registry.constants() {
        let _ = match (language, constant.value) {
            (ShaderLanguage::Hlsl, ConstantValue::UInt(v)) => {
                writeln!(out, "static const uint {} = {v};", constant.name)
            }
            (ShaderLanguage::Hlsl, ConstantValue::Float(v)) => {
                writeln!(out, "static const float {} = {v:?}f;", constant.name)
            }
            (ShaderLanguage::Wgsl, ConstantValue::UInt(v)) => {
                writeln!(out, "const {}: u32 = {v}u;", constant.name)
            }
            (ShaderLanguage::Wgsl, ConstantValue::Float(v)) => {
                writeln!(out, "const {}: f32 = {v:?};", constant.name)
            }
        };
    }
}

enum MemberKind {
    Field(PackedType),
    Pad,
}

struct Member {
    name: String,
    offset: u32,
    kind: MemberKind,
}

impl Member {
    fn ty_name(&self, language: ShaderLanguage) -> &'static str {
        match (&self.kind, language) {
            (MemberKind::Field(ty), _) => ty.shader_type(language),
            (MemberKind::Pad, ShaderLanguage::Hlsl) => "uint",
            (MemberKind::Pad, ShaderLanguage::Wgsl) => "u32",
        }
    }
}

/// Flattens the layout into 4-byte-granular members, padding every gap.
fn members(layout: &PackedLayout) -> Vec<Member> {
    // Bare names unless two settings in different groups share one.
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in layout.entries() {
        *counts.entry(bare_name(&entry.name)).or_default() += 1;
    }

    let mut members = Vec::new();
    let mut pad_index = 0;
    let mut cursor = 0u32;
    let mut pad_to = |members: &mut Vec<Member>, from: u32, to: u32| {
        for offset in (from..to).step_by(4) {
            members.push(Member {
                name: format!("_pad{pad_index}"),
                offset,
                kind: MemberKind::Pad,
            });
            pad_index += 1;
        }
    };

    for entry in layout.entries() {
        pad_to(&mut members, cursor, entry.offset);
        let bare = bare_name(&entry.name);
        let name = if counts.get(bare).copied().unwrap_or(0) > 1 {
            entry.name.replace('.', "_")
        } else {
            bare.to_owned()
        };
        members.push(Member {
            name,
            offset: entry.offset,
            kind: MemberKind::Field(entry.ty),
        });
        // Vectors declare three components; the fourth word is padding.
        let declared = match entry.ty {
            PackedType::Color | PackedType::Direction => 12,
            _ => entry.size,
        };
        cursor = entry.offset + declared;
    }
    pad_to(&mut members, cursor, layout.size());
    members
}

fn bare_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knob_core::math::Vec3;
    use knob_core::settings::{GroupDecl, SchemaDecl, SettingAttributes, SettingDecl};

    fn registry() -> SchemaRegistry {
        let attrs = SettingAttributes::new;
        SchemaRegistry::build(
            &SchemaDecl::new(
                "AppSettings",
                GroupDecl::new("AppSettings")
                    .group(
                        GroupDecl::new("sky")
                            .setting(SettingDecl::boolean("enable_sun", true, attrs()))
                            .setting(SettingDecl::float("size", 1.0, attrs()))
                            .setting(SettingDecl::direction("sun_direction", Vec3::Y, attrs())),
                    )
                    .group(GroupDecl::new("bloom").setting(SettingDecl::float("size", 2.0, attrs()))),
            )
            .constant("MaxSpotLights", 32u32)
            .constant("SpotLightRange", 7.5f32),
        )
        .unwrap()
    }

    #[test]
    fn test_hlsl_pads_explicitly() {
        let registry = registry();
        let layout = PackedLayout::build(&registry);
        let text = ShaderHeader::emit(ShaderLanguage::Hlsl, "AppSettings", 12, &layout, &registry);

        assert!(text.contains("static const uint MaxSpotLights = 32;"));
        assert!(text.contains("static const float SpotLightRange = 7.5f;"));
        assert!(text.contains("cbuffer AppSettings : register(b12)"));
        assert!(text.contains("bool enable_sun; // offset 0"));
        assert!(text.contains("uint _pad0; // offset 8"));
        assert!(text.contains("float3 sun_direction; // offset 16"));
        assert!(text.contains("uint _pad2; // offset 28"));
        assert!(text.contains("float bloom_size; // offset 32"));
        assert!(text.contains("float sky_size; // offset 4"));
    }

    #[test]
    fn test_wgsl_struct_and_binding() {
        let registry = registry();
        let layout = PackedLayout::build(&registry);
        let text = ShaderHeader::emit(ShaderLanguage::Wgsl, "AppSettings", 0, &layout, &registry);

        assert!(text.contains("const MaxSpotLights: u32 = 32u;"));
        assert!(text.contains("struct AppSettings {"));
        assert!(text.contains("sun_direction: vec3<f32>, // offset 16"));
        assert!(text.contains("@group(0) @binding(0) var<uniform> settings: AppSettings;"));
        // Trailing padding up to the 48-byte size.
        assert!(text.contains("_pad5: u32, // offset 44"));
    }
}
