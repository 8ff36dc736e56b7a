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

//! Settings of the clustered/deferred renderer.

use knob_sdk::prelude::*;

pub const CLUSTER_TILE_SIZE: u32 = 16;
pub const NUM_Z_TILES: u32 = 16;

pub const NUM_DECAL_TYPES: u32 = 8;
pub const NUM_TEXTURES_PER_DECAL: u32 = 2;
pub const NUM_DECAL_TEXTURES: u32 = NUM_DECAL_TYPES * NUM_TEXTURES_PER_DECAL;
pub const MAX_DECALS: u32 = 64;
pub const DECAL_ELEMENTS_PER_CLUSTER: u32 = MAX_DECALS / 32;

pub const MAX_SPOT_LIGHTS: u32 = 32;
pub const SPOT_LIGHT_ELEMENTS_PER_CLUSTER: u32 = MAX_SPOT_LIGHTS / 32;
pub const SPOT_LIGHT_RANGE: f32 = 7.5;

pub const DEFERRED_TILE_SIZE: u32 = 8;
pub const DEFERRED_TILE_MASK_SIZE: u32 = (DEFERRED_TILE_SIZE * DEFERRED_TILE_SIZE) / 32;

pub const DEFERRED_UV_SCALE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, SettingEnum)]
pub enum Scenes {
    Sponza,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, SettingEnum)]
pub enum MsaaModes {
    #[setting(label = "None")]
    MsaaNone,
    #[setting(label = "2x")]
    Msaa2x,
    #[setting(label = "4x")]
    Msaa4x,
}

impl MsaaModes {
    /// Samples per pixel.
    pub fn num_samples(self) -> u32 {
        match self {
            MsaaModes::MsaaNone => 1,
            MsaaModes::Msaa2x => 2,
            MsaaModes::Msaa4x => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, SettingEnum)]
pub enum RenderModes {
    #[setting(label = "Clustered Forward")]
    ClusteredForward,
    #[setting(label = "Deferred Texturing")]
    DeferredTexturing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, SettingEnum)]
pub enum ClusterRasterizationModes {
    Normal,
    #[setting(label = "MSAA 4x")]
    Msaa4x,
    #[setting(label = "MSAA 8x")]
    Msaa8x,
    Conservative,
}

#[derive(Settings)]
pub struct SunAndSky {
    #[setting(help = "Enables the sun light")]
    pub enable_sun: bool,
    #[setting(help = "Controls whether the sun is treated as a disc area light in the real-time shader")]
    pub sun_area_light_approximation: bool,
    #[setting(help = "Angular radius of the sun in degrees", min = 0.01, step = 0.01)]
    pub sun_size: f32,
    #[setting(help = "Direction of the sun", view_space)]
    pub sun_direction: Direction,
    #[setting(
        help = "Atmospheric turbidity (thickness) uses for procedural sun and sky model",
        min = 1.0,
        max = 10.0,
        step = 0.01,
        shader_constant = false
    )]
    pub turbidity: f32,
    #[setting(
        help = "Ground albedo color used for procedural sun and sky model",
        hdr = false,
        shader_constant = false
    )]
    pub ground_albedo: Color,
}

impl Default for SunAndSky {
    fn default() -> Self {
        Self {
            enable_sun: true,
            sun_area_light_approximation: true,
            sun_size: 1.0,
            sun_direction: Vec3::new(0.26, 0.987, -0.16),
            turbidity: 2.0,
            ground_albedo: LinearRgba::rgb(0.25, 0.25, 0.25),
        }
    }
}

#[derive(Settings)]
pub struct AntiAliasing {
    #[setting(help = "MSAA mode to use for rendering", display_name = "MSAA Mode")]
    pub msaa_mode: MsaaModes,
}

impl Default for AntiAliasing {
    fn default() -> Self {
        Self {
            msaa_mode: MsaaModes::MsaaNone,
        }
    }
}

#[derive(Settings)]
pub struct Scene {
    #[setting(shader_constant = false)]
    pub current_scene: Scenes,
    #[setting(help = "Enable or disable deferred light rendering")]
    pub render_lights: bool,
    #[setting(help = "Enable or disable applying decals in the main pass")]
    pub render_decals: bool,
    pub clear_decals: Button,
    #[setting(
        help = "Enables or disables placing new decals with the mouse",
        shader_constant = false
    )]
    pub enable_decal_picker: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            current_scene: Scenes::Sponza,
            render_lights: true,
            render_decals: true,
            clear_decals: Button,
            enable_decal_picker: true,
        }
    }
}

#[derive(Settings)]
pub struct Rendering {
    #[setting(help = "The rendering technique to use")]
    pub render_mode: RenderModes,
    #[setting(
        help = "Renders a depth prepass before the main pass or G-Buffer pass",
        shader_constant = false
    )]
    pub depth_prepass: bool,
    #[setting(
        help = "Enables sorting meshes by their depth in front-to-back order",
        shader_constant = false
    )]
    pub sort_by_depth: bool,
    #[setting(
        help = "Limits the number of lights in the scene",
        display_name = "Max Lights",
        min = 0,
        max = MAX_SPOT_LIGHTS,
        shader_constant = false
    )]
    pub max_light_clamp: i32,
    #[setting(
        help = "Conservative rasterization mode to use for light binning",
        shader_constant = false
    )]
    pub cluster_rasterization_mode: ClusterRasterizationModes,
    #[setting(
        help = "Use Z gradients to detect edges during MSAA mask generation",
        display_name = "Use Z DX/DY For MSAA Mask",
        shader_constant = false
    )]
    pub use_z_gradients_for_msaa_mask: bool,
    #[setting(
        help = "Choose whether to compute UV gradients for deferred rendering, or explicitly store them in the G-Buffer",
        display_name = "Compute UV Gradients",
        shader_constant = false
    )]
    pub compute_uv_gradients: bool,
}

impl Default for Rendering {
    fn default() -> Self {
        Self {
            render_mode: RenderModes::DeferredTexturing,
            depth_prepass: false,
            sort_by_depth: true,
            max_light_clamp: MAX_SPOT_LIGHTS as i32,
            cluster_rasterization_mode: ClusterRasterizationModes::Conservative,
            use_z_gradients_for_msaa_mask: false,
            compute_uv_gradients: false,
        }
    }
}

#[derive(Settings)]
#[settings(expand = false)]
pub struct PostProcessing {
    #[setting(
        help = "Simple exposure value applied to the scene before tone mapping (uses log2 scale)",
        min = -24.0,
        max = 24.0,
        step = 0.1
    )]
    pub exposure: f32,
    #[setting(
        help = "Exposure offset applied to generate the input of the bloom pass",
        display_name = "Bloom Exposure Offset",
        min = -10.0,
        max = 0.0,
        step = 0.01
    )]
    pub bloom_exposure: f32,
    #[setting(
        help = "Scale factor applied to the bloom results when combined with tone-mapped result",
        min = 0.0,
        max = 2.0,
        step = 0.01
    )]
    pub bloom_magnitude: f32,
    #[setting(
        help = "Sigma parameter of the Gaussian filter used in the bloom pass",
        min = 0.5,
        max = 2.5,
        step = 0.01
    )]
    pub bloom_blur_sigma: f32,
}

impl Default for PostProcessing {
    fn default() -> Self {
        Self {
            exposure: -14.0,
            bloom_exposure: -4.0,
            bloom_magnitude: 1.0,
            bloom_blur_sigma: 2.5,
        }
    }
}

#[derive(Settings)]
pub struct DebugSettings {
    #[setting(
        help = "Enables or disables vertical sync during Present",
        display_name = "Enable VSync",
        shader_constant = false
    )]
    pub enable_vsync: bool,
    #[setting(help = "Enables albedo maps")]
    pub enable_albedo_maps: bool,
    #[setting(help = "Enables normal maps")]
    pub enable_normal_maps: bool,
    #[setting(help = "Enables specular reflections")]
    pub enable_specular: bool,
    #[setting(help = "Visualizes the light count for a pixel")]
    pub show_light_counts: bool,
    #[setting(help = "Visualizes the decal count for a pixel")]
    pub show_decal_counts: bool,
    #[setting(
        help = "Shows an overhead perspective of the view frustum with a visualization of the light/decal counts",
        shader_constant = false
    )]
    pub show_cluster_visualizer: bool,
    #[setting(
        help = "Visualizes the pixels where per-sample shading is applied",
        display_name = "Show MSAA Mask"
    )]
    pub show_msaa_mask: bool,
    #[setting(
        help = "Visualize the UV gradients used for mip selection",
        display_name = "Show UV Gradients"
    )]
    pub show_uv_gradients: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            enable_vsync: true,
            enable_albedo_maps: true,
            enable_normal_maps: true,
            enable_specular: true,
            show_light_counts: false,
            show_decal_counts: false,
            show_cluster_visualizer: false,
            show_msaa_mask: false,
            show_uv_gradients: false,
        }
    }
}

#[derive(Settings, Default)]
pub struct AppSettings {
    pub sun_and_sky: SunAndSky,
    pub anti_aliasing: AntiAliasing,
    pub scene: Scene,
    pub rendering: Rendering,
    pub post_processing: PostProcessing,
    pub debug: DebugSettings,
}

impl AppSettings {
    /// The schema plus the constants shared with the shaders.
    pub fn schema_with_constants() -> knob_core::settings::SchemaDecl {
        <Self as Settings>::schema()
            .constant("ClusterTileSize", CLUSTER_TILE_SIZE)
            .constant("NumZTiles", NUM_Z_TILES)
            .constant("NumDecalTypes", NUM_DECAL_TYPES)
            .constant("NumTexturesPerDecal", NUM_TEXTURES_PER_DECAL)
            .constant("NumDecalTextures", NUM_DECAL_TEXTURES)
            .constant("MaxDecals", MAX_DECALS)
            .constant("DecalElementsPerCluster", DECAL_ELEMENTS_PER_CLUSTER)
            .constant("MaxSpotLights", MAX_SPOT_LIGHTS)
            .constant("SpotLightElementsPerCluster", SPOT_LIGHT_ELEMENTS_PER_CLUSTER)
            .constant("SpotLightRange", SPOT_LIGHT_RANGE)
            .constant("DeferredTileSize", DEFERRED_TILE_SIZE)
            .constant("DeferredTileMaskSize", DEFERRED_TILE_MASK_SIZE)
            .constant("DeferredUVScale", DEFERRED_UV_SCALE)
    }
}
