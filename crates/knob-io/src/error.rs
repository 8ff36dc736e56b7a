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
//! Persistence error type.

use std::path::PathBuf;

/// A problem reading or writing a preset.
///
/// [`Io`](Self::Io) and [`Encode`](Self::Encode) abort the operation. The
/// per-record variants are collected in
/// [`LoadOutcome::issues`](crate::LoadOutcome::issues) while loading carries on.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the preset file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A value could not be encoded.
    #[error("Failed to encode '{name}': {source}")]
    Encode {
        /// Qualified name of the setting.
        name: String,
        /// The underlying error.
        #[source]
        source: ron::Error,
    },
    /// A line is neither blank, a comment, nor a `name = value` record.
    #[error("line {line}: malformed record '{text}'")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },
    /// A record names no known setting.
    #[error("line {line}: unknown setting '{name}'")]
    UnknownKey {
        /// 1-based line number.
        line: usize,
        /// The unknown name.
        name: String,
    },
    /// A record repeats an earlier one. The later record wins.
    #[error("line {line}: '{name}' already set on line {first}")]
    DuplicateKey {
        /// 1-based line number.
        line: usize,
        /// Line of the first record.
        first: usize,
        /// Qualified name of the setting.
        name: String,
    },
    /// A value could not be parsed or was rejected; the default is kept.
    #[error("line {line}: invalid value for '{name}': {reason}")]
    InvalidValue {
        /// 1-based line number.
        line: usize,
        /// Qualified name of the setting.
        name: String,
        /// Why the value was refused.
        reason: String,
    },
    /// A value was accepted after clamping, snapping or normalization.
    #[error("line {line}: value of '{name}' was adjusted to fit its constraints")]
    Adjusted {
        /// 1-based line number.
        line: usize,
        /// Qualified name of the setting.
        name: String,
    },
}
