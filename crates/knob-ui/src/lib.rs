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

//! Binds a settings registry to an immediate-mode UI.
//!
//! Rendering walks the group tree in declaration order, asks a [`UiBackend`]
//! to draw one control per setting, and routes every edit through the
//! validation engine before it reaches the store. The backend only ever sees
//! plain values; it never touches the store.

#![warn(missing_docs)]

mod backend;
mod control;
mod render;

pub use backend::UiBackend;
pub use control::{control_kind_for, ControlKind};
pub use render::{layout_items, render_group, LayoutItem, UiEvent};
