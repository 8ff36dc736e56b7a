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

//! Runtime configuration, read from `Knob.toml`.

use anyhow::{Context, Result};
use knob_data::ShaderLanguage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name looked up by [`KnobConfig::load_or_default`].
pub const CONFIG_FILE: &str = "Knob.toml";

/// Settings of the settings framework itself.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnobConfig {
    /// Preset file applied at startup and written by autosave.
    pub preset_path: Option<PathBuf>,
    /// Save to `preset_path` when the context is dropped.
    pub autosave: bool,
    /// Name of the generated constant buffer.
    pub cbuffer_name: String,
    /// Register (HLSL) or binding (WGSL) of the constant buffer.
    pub cbuffer_register: u32,
    /// Language of generated shader headers.
    pub shader_language: ShaderLanguage,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for KnobConfig {
    fn default() -> Self {
        Self {
            preset_path: None,
            autosave: false,
            cbuffer_name: "AppSettings".to_owned(),
            cbuffer_register: 12,
            shader_language: ShaderLanguage::Hlsl,
            log_filter: "info".to_owned(),
        }
    }
}

impl KnobConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse Knob configuration")
    }

    /// Reads `path`, falling back to the defaults if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("KnobConfig: No '{}' found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))?;
        log::info!("KnobConfig: Loaded '{}'", path.display());
        Ok(config)
    }
}
