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

//! Logger setup for binaries.

use crate::config::KnobConfig;
use env_logger::{Builder, Env};

/// Installs `env_logger`, using `config.log_filter` unless `RUST_LOG` is set.
///
/// Calling it again once a logger is installed does nothing.
pub fn init_logging(config: &KnobConfig) {
    let result = Builder::from_env(Env::default().default_filter_or(config.log_filter.as_str()))
        .format_timestamp_millis()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
