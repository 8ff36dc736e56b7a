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

//! # Knob SDK
//!
//! Declare renderer settings as annotated structs, edit them through any UI
//! backend, and hand a correctly packed constant buffer to the GPU every frame.
//!
//! ```ignore
//! use knob_sdk::prelude::*;
//!
//! #[derive(Settings)]
//! struct PostProcessing {
//!     #[setting(min = -24.0, max = 24.0, step = 0.1, help = "Exposure in EV")]
//!     exposure: f32,
//! }
//!
//! let mut context = SettingsContext::from_settings::<PostProcessing>()?;
//! context.propose("exposure", 2.5)?;
//! let bytes = context.prepare_frame();
//! ```
//!
//! The derives expand to `::knob_core` paths, so crates using them depend on
//! `knob-core` directly.

mod config;
mod context;
mod logging;

pub use config::{KnobConfig, CONFIG_FILE};
pub use context::SettingsContext;
pub use logging::init_logging;

pub use knob_core as core;
pub use knob_data as data;
pub use knob_io as io;
pub use knob_ui as ui;

/// Everything needed to declare a schema and drive a context.
pub mod prelude {
    pub use crate::{init_logging, KnobConfig, SettingsContext};
    pub use knob_core::math::{LinearRgba, Mat4, Vec3};
    pub use knob_core::settings::{
        Button, Color, ConversionMode, Direction, SettingEnum, SettingValue, Settings,
    };
    pub use knob_data::ShaderLanguage;
    pub use knob_macros::{SettingEnum, Settings};
    pub use knob_ui::{UiBackend, UiEvent};
}
