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

//! Identifier helpers shared by the registry, the UI and persistence.

/// Separator between segments of a qualified name.
pub const PATH_SEPARATOR: char = '.';

/// Turns an identifier into a human-readable label.
///
/// Splits on underscores and on case boundaries, keeping runs of capitals
/// together, then capitalizes each word.
///
/// ```
/// use knob_core::settings::display_name;
///
/// assert_eq!(display_name("sun_direction"), "Sun Direction");
/// assert_eq!(display_name("MSAAMode"), "MSAA Mode");
/// assert_eq!(display_name("EnableSun"), "Enable Sun");
/// ```
pub fn display_name(ident: &str) -> String {
    let mut words: Vec<String> = Vec::new();

    for segment in ident.split('_').filter(|s| !s.is_empty()) {
        let chars: Vec<char> = segment.chars().collect();
        let mut current = String::new();
        for (i, &c) in chars.iter().enumerate() {
            if i > 0 && c.is_uppercase() {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Joins a parent path and a child name into a qualified name.
///
/// An empty parent yields the bare name, so children of the root group are
/// not prefixed.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}{PATH_SEPARATOR}{name}")
    }
}

/// Returns `true` if `name` is usable as a path segment and as a shader identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
