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

//! The [`SettingsContext`] facade.

use crate::config::KnobConfig;
use knob_core::math::{LinearRgba, Mat4, Vec3};
use knob_core::settings::{
    SchemaDecl, SchemaError, SettingEnum, SettingId, SettingKind, SettingValue, Settings,
    ValidationError,
};
use knob_data::{
    AcceptedValue, ButtonSignals, ConstantBufferWriter, FrameBuffers, PackedLayout,
    SchemaRegistry, ShaderHeader, ShaderLanguage, ValueStore,
};
use knob_io::PersistenceError;
use knob_ui::{render_group, UiBackend, UiEvent};
use std::path::Path;

/// Owns a settings schema and everything derived from it.
///
/// One context drives one schema for the life of the application:
///
/// ```text
/// render_ui()      edits -> validation -> ValueStore (dirty / changed)
/// prepare_frame()  dirty slots -> staging -> back buffer -> swap
/// end_frame()      drop unpolled button presses, clear changed flags
/// ```
///
/// Everything runs on the thread that owns the context. The render side reads
/// [`front_buffer`](Self::front_buffer), which is never the buffer being
/// written.
pub struct SettingsContext {
    config: KnobConfig,
    registry: SchemaRegistry,
    store: ValueStore,
    layout: PackedLayout,
    writer: ConstantBufferWriter,
    frames: FrameBuffers,
    buttons: ButtonSignals,
    view: Mat4,
}

impl SettingsContext {
    /// Builds a context for `schema` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found in `schema`.
    pub fn new(schema: &SchemaDecl) -> Result<Self, SchemaError> {
        Self::with_config(schema, KnobConfig::default())
    }

    /// Builds a context from a `#[derive(Settings)]` struct.
    pub fn from_settings<S: Settings>() -> Result<Self, SchemaError> {
        Self::new(&S::schema())
    }

    /// Builds a context for `schema` and applies `config.preset_path` if the
    /// file exists.
    ///
    /// A preset that cannot be read is logged and skipped; the context starts
    /// from the defaults.
    pub fn with_config(schema: &SchemaDecl, config: KnobConfig) -> Result<Self, SchemaError> {
        let registry = SchemaRegistry::build(schema)?;
        let store = ValueStore::from_defaults(&registry);
        let layout = PackedLayout::build(&registry);
        let writer = ConstantBufferWriter::new(&layout);
        let frames = FrameBuffers::new(layout.size() as usize);

        let mut context = Self {
            config,
            registry,
            store,
            layout,
            writer,
            frames,
            buttons: ButtonSignals::new(),
            view: Mat4::IDENTITY,
        };

        if let Some(path) = context.config.preset_path.clone() {
            if path.exists() {
                if let Err(err) = context.load_from(&path) {
                    log::warn!("SettingsContext: Ignoring preset: {err}");
                }
            }
        }

        log::info!(
            "SettingsContext: Ready for '{}' ({} settings, {} packed bytes)",
            context.registry.name(),
            context.registry.len(),
            context.layout.size()
        );
        Ok(context)
    }

    /// The configuration the context was built with.
    pub fn config(&self) -> &KnobConfig {
        &self.config
    }

    /// The compiled schema.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Current values.
    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    /// The packed buffer layout.
    pub fn layout(&self) -> &PackedLayout {
        &self.layout
    }

    fn id(&self, name: &str) -> Result<SettingId, ValidationError> {
        self.registry
            .lookup(name)
            .ok_or_else(|| ValidationError::UnknownSetting {
                name: name.to_owned(),
            })
    }

    fn id_of_kind(&self, name: &str, kind: SettingKind) -> Result<SettingId, ValidationError> {
        let id = self.id(name)?;
        let found = self.registry.descriptor(id).map(|d| d.kind);
        match found {
            Some(found) if found == kind => Ok(id),
            Some(found) => Err(ValidationError::TypeMismatch {
                name: name.to_owned(),
                expected: kind,
                found,
            }),
            None => Err(ValidationError::UnknownSetting {
                name: name.to_owned(),
            }),
        }
    }

    // --- Values ---

    /// Validates `raw` and stores the result.
    pub fn propose(
        &mut self,
        name: &str,
        raw: impl Into<SettingValue>,
    ) -> Result<AcceptedValue, ValidationError> {
        self.store.propose_by_name(&self.registry, name, raw.into())
    }

    /// The current value of `name`.
    pub fn value(&self, name: &str) -> Option<SettingValue> {
        self.store.get(self.registry.lookup(name)?)
    }

    /// The value of a boolean setting.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.value(name)?.as_bool()
    }

    /// The value of a float setting, before any conversion.
    pub fn float(&self, name: &str) -> Option<f32> {
        self.value(name)?.as_float()
    }

    /// The value of an int setting.
    pub fn int(&self, name: &str) -> Option<i32> {
        self.value(name)?.as_int()
    }

    /// The ordinal of an enum setting.
    pub fn enum_value(&self, name: &str) -> Option<u32> {
        self.value(name)?.as_enum()
    }

    /// The variant of an enum setting.
    pub fn enum_as<E: SettingEnum>(&self, name: &str) -> Option<E> {
        E::from_ordinal(self.enum_value(name)?)
    }

    /// The value of a color setting.
    pub fn color(&self, name: &str) -> Option<LinearRgba> {
        self.value(name)?.as_color()
    }

    /// The world-space value of a direction setting.
    pub fn direction(&self, name: &str) -> Option<Vec3> {
        self.value(name)?.as_direction()
    }

    /// Rebuilds the typed settings struct from the current values.
    pub fn snapshot<S: Settings>(&self) -> S {
        S::snapshot(&self.store.source(&self.registry))
    }

    /// Did `name` change since the last [`end_frame`](Self::end_frame)?
    pub fn changed(&self, name: &str) -> bool {
        self.registry
            .lookup(name)
            .is_some_and(|id| self.store.changed(id))
    }

    /// Restores the default of `name`.
    pub fn reset(&mut self, name: &str) -> Result<(), ValidationError> {
        let id = self.id(name)?;
        self.store.reset(&self.registry, id);
        Ok(())
    }

    /// Restores every default.
    pub fn reset_all(&mut self) {
        self.store.reset_all(&self.registry);
    }

    // --- Buttons ---

    /// Presses the button `name`.
    pub fn invoke(&mut self, name: &str) -> Result<(), ValidationError> {
        let id = self.id_of_kind(name, SettingKind::Button)?;
        self.buttons.invoke(id);
        Ok(())
    }

    /// Returns `true` once for each press of `name` in the current frame.
    pub fn pressed(&mut self, name: &str) -> bool {
        match self.registry.lookup(name) {
            Some(id) => self.buttons.poll(id),
            None => false,
        }
    }

    // --- Presentation ---

    /// Shows or hides `name` in the UI.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), ValidationError> {
        let id = self.id(name)?;
        self.store.set_visible(id, visible);
        Ok(())
    }

    /// Caps the selectable ordinals of enum `name`, or lifts the cap with `None`.
    pub fn restrict_enum(
        &mut self,
        name: &str,
        max_ordinal: Option<u32>,
    ) -> Result<(), ValidationError> {
        let id = self.id(name)?;
        self.store.set_enum_limit(&self.registry, id, max_ordinal)
    }

    /// Sets the camera used to edit view-space directions.
    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    /// The current camera view matrix.
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Draws every setting and applies the edits. Button clicks raise their
    /// signals, to be read with [`pressed`](Self::pressed).
    pub fn render_ui(&mut self, ui: &mut dyn UiBackend) -> Vec<UiEvent> {
        let events = render_group(
            ui,
            &self.registry,
            self.registry.root(),
            &mut self.store,
            &self.view,
        );
        for event in &events {
            if let UiEvent::ButtonPressed { id } = event {
                self.buttons.invoke(*id);
            }
        }
        events
    }

    // --- Frame ---

    /// Packs the changed values and publishes them to the render side.
    ///
    /// Returns the bytes the render thread should upload this frame.
    pub fn prepare_frame(&mut self) -> &[u8] {
        self.writer.update(&self.layout, &mut self.store);
        self.frames.publish(self.writer.bytes());
        self.frames.front()
    }

    /// The last published buffer.
    pub fn front_buffer(&self) -> &[u8] {
        self.frames.front()
    }

    /// Closes the frame: unpolled button presses are dropped and changed
    /// flags cleared.
    pub fn end_frame(&mut self) {
        self.buttons.end_frame();
        self.store.clear_changed();
    }

    // --- Persistence ---

    /// Renders the current values as preset text.
    pub fn save_preset(&self) -> Result<String, PersistenceError> {
        knob_io::save(&self.registry, &self.store)
    }

    /// Applies preset text. Changed values are packed on the next frame.
    ///
    /// Returns the records that could not be used as written.
    pub fn load_preset(&mut self, text: &str) -> Vec<PersistenceError> {
        knob_io::apply(text, &self.registry, &mut self.store)
    }

    /// Writes the current values to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), PersistenceError> {
        knob_io::save_to_path(path, &self.registry, &self.store)
    }

    /// Reads `path` and applies it.
    ///
    /// # Errors
    ///
    /// Fails only if the file cannot be read; per-record problems are returned
    /// in the `Ok` value.
    pub fn load_from(&mut self, path: &Path) -> Result<Vec<PersistenceError>, PersistenceError> {
        let text = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let issues = self.load_preset(&text);
        log::info!(
            "SettingsContext: Applied '{}' ({} issue(s))",
            path.display(),
            issues.len()
        );
        Ok(issues)
    }

    // --- Shader interop ---

    /// Emits shader declarations for the packed layout, named and bound as
    /// configured.
    pub fn shader_header(&self, language: ShaderLanguage) -> String {
        ShaderHeader::emit(
            language,
            &self.config.cbuffer_name,
            self.config.cbuffer_register,
            &self.layout,
            &self.registry,
        )
    }

    /// [`shader_header`](Self::shader_header) in the configured language.
    pub fn default_shader_header(&self) -> String {
        self.shader_header(self.config.shader_language)
    }
}

impl Drop for SettingsContext {
    fn drop(&mut self) {
        if !self.config.autosave {
            return;
        }
        let Some(path) = self.config.preset_path.as_deref() else {
            return;
        };
        if let Err(err) = self.save_to(path) {
            log::error!("SettingsContext: Autosave failed: {err}");
        }
    }
}
