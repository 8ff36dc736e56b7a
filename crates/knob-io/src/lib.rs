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
//! # Knob IO
//!
//! Reads and writes presets: plain text files holding one
//! `qualified.name = value` record per line, with values in RON notation.
//!
//! ```text
//! # Knob preset for 'AppSettings'
//!
//! # Sun And Sky
//! sun_and_sky.enable_sun = true
//! sun_and_sky.sun_direction = (0.26, 0.96, -0.16)
//! anti_aliasing.msaa_mode = "MSAA4x"
//! ```

#![warn(missing_docs)]

mod error;
mod preset;

pub use error::PersistenceError;
pub use preset::{apply, load, load_from_path, save, save_to_path, LoadOutcome};
