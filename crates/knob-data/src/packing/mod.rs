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

//! Constant-buffer packing for the shader-visible subset of a schema.
//!
//! # Architecture
//!
//! ```text
//! SchemaRegistry ──build──▶ PackedLayout (offsets, cached)
//!                                │
//! ValueStore ──dirty ids──▶ ConstantBufferWriter (staging bytes)
//!                                │ publish
//!                                ▼
//!                           FrameBuffers [front: render | back: control]
//! ```
//!
//! Every field sits inside a single 16-byte row; a scalar that would cross a
//! row boundary starts the next row instead. Vectors always take a full row.

mod frame;
mod header;
mod layout;
mod writer;

pub use frame::FrameBuffers;
pub use header::{ShaderHeader, ShaderLanguage};
pub use layout::{PackedEntry, PackedLayout, PackedType, ROW_SIZE};
pub use writer::{serialize, ConstantBufferWriter};
