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

//! Edge-triggered button signals.

use crate::bitset::FlagSet;
use knob_core::SettingId;

/// Pending presses, one flag per setting id.
///
/// Invoking an already pending button does nothing, so two presses between
/// polls fire once. A poll consumes the signal. Signals nobody polled are
/// dropped at the end of the frame.
#[derive(Debug, Default, Clone)]
pub struct ButtonSignals {
    pending: FlagSet,
}

impl ButtonSignals {
    /// Creates an empty set of signals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal of `id`.
    pub fn invoke(&mut self, id: SettingId) {
        self.pending.set(id);
    }

    /// Returns `true` exactly once per raised signal.
    pub fn poll(&mut self, id: SettingId) -> bool {
        let fired = self.pending.is_set(id);
        self.pending.clear(id);
        fired
    }

    /// Returns `true` if `id` is raised, without consuming it.
    pub fn is_pending(&self, id: SettingId) -> bool {
        self.pending.is_set(id)
    }

    /// Drops every unconsumed signal and returns how many there were.
    pub fn end_frame(&mut self) -> usize {
        let dropped = self.pending.count();
        if dropped > 0 {
            log::trace!("ButtonSignals: Dropped {dropped} unconsumed press(es)");
        }
        self.pending.clear_all();
        dropped
    }
}
