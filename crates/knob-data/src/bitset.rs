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

//! A dense bitset used for per-setting flags.

use knob_core::SettingId;

/// One bit per setting, backed by a `Vec<u64>`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct FlagSet {
    bits: Vec<u64>,
}

impl FlagSet {
    /// Creates a cleared set able to hold `len` flags without growing.
    pub(crate) fn with_len(len: usize) -> Self {
        Self {
            bits: vec![0; len.div_ceil(64)],
        }
    }

    pub(crate) fn set(&mut self, id: SettingId) {
        let word_idx = id.index() / 64;
        let bit_idx = id.0 % 64;

        if word_idx >= self.bits.len() {
            self.bits.resize(word_idx + 1, 0);
        }

        self.bits[word_idx] |= 1 << bit_idx;
    }

    pub(crate) fn clear(&mut self, id: SettingId) {
        let word_idx = id.index() / 64;
        let bit_idx = id.0 % 64;

        if let Some(word) = self.bits.get_mut(word_idx) {
            *word &= !(1 << bit_idx);
        }
    }

    pub(crate) fn is_set(&self, id: SettingId) -> bool {
        let word_idx = id.index() / 64;
        let bit_idx = id.0 % 64;

        self.bits
            .get(word_idx)
            .is_some_and(|word| (word & (1 << bit_idx)) != 0)
    }

    /// Clears every flag, keeping the allocation.
    pub(crate) fn clear_all(&mut self) {
        self.bits.iter_mut().for_each(|word| *word = 0);
    }

    pub(crate) fn any(&self) -> bool {
        self.bits.iter().any(|&word| word != 0)
    }

    pub(crate) fn count(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterates over the set flags in ascending id order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = SettingId> + '_ {
        self.bits.iter().enumerate().flat_map(|(word_idx, &word)| {
            let mut remaining = word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros();
                remaining &= remaining - 1;
                Some(SettingId(word_idx as u32 * 64 + bit))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clear_and_iterate() {
        let mut flags = FlagSet::with_len(130);
        flags.set(SettingId(3));
        flags.set(SettingId(64));
        flags.set(SettingId(129));
        assert!(flags.is_set(SettingId(64)));
        assert_eq!(flags.count(), 3);

        flags.clear(SettingId(64));
        let ids: Vec<u32> = flags.iter().map(|id| id.0).collect();
        assert_eq!(ids, [3, 129]);

        flags.clear_all();
        assert!(!flags.any());
    }

    #[test]
    fn test_set_grows_past_initial_len() {
        let mut flags = FlagSet::default();
        flags.set(SettingId(200));
        assert!(flags.is_set(SettingId(200)));
        assert!(!flags.is_set(SettingId(199)));
    }
}
