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

//! Double-buffered hand-off of packed bytes to the render thread.
//!
//! ```text
//! Frame N:     [Slot 0: render reads]  [Slot 1: control writes]
//! publish()    swap
//! Frame N+1:   [Slot 1: render reads]  [Slot 0: control writes]
//! ```
//!
//! The render side only ever sees a slot after a complete copy, so it never
//! observes a half-written buffer.

/// Number of buffer instances alternated per frame.
pub const FRAME_SLOTS: usize = 2;

/// Two byte buffers alternated between a writer and a reader.
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    slots: [Vec<u8>; FRAME_SLOTS],
    /// Index of the slot the render thread reads.
    front: usize,
    /// Number of completed publishes.
    frame: u64,
}

impl FrameBuffers {
    /// Creates both slots zero-filled with `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            slots: [vec![0; size], vec![0; size]],
            front: 0,
            frame: 0,
        }
    }

    /// Copies `bytes` into the back slot, then makes it the front.
    pub fn publish(&mut self, bytes: &[u8]) {
        let back = self.back_index();
        let slot = &mut self.slots[back];
        slot.clear();
        slot.extend_from_slice(bytes);
        self.swap();
    }

    /// Exchanges the front and back slots.
    pub fn swap(&mut self) {
        self.front = self.back_index();
        self.frame += 1;
    }

    /// The bytes the render thread should read.
    pub fn front(&self) -> &[u8] {
        &self.slots[self.front]
    }

    /// Borrows the front slot for reading and the back slot for writing at once.
    pub fn split(&mut self) -> (&[u8], &mut Vec<u8>) {
        let (first, second) = self.slots.split_at_mut(1);
        if self.front == 0 {
            (first[0].as_slice(), &mut second[0])
        } else {
            (second[0].as_slice(), &mut first[0])
        }
    }

    /// Index of the current front slot (for debugging/telemetry).
    pub fn front_index(&self) -> usize {
        self.front
    }

    /// Number of publishes so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn back_index(&self) -> usize {
        (self.front + 1) % FRAME_SLOTS
    }
}
