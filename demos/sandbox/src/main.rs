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

//! Drives the renderer settings for a few simulated frames without a window.
//!
//! ```text
//! sandbox            run the simulated frames
//! sandbox header     print the declarations in the configured language
//! sandbox header wgsl
//! ```

mod settings;

use anyhow::{anyhow, Context, Result};
use knob_infra::EguiBackend;
use knob_sdk::prelude::*;
use knob_sdk::CONFIG_FILE;
use settings::{AppSettings, MsaaModes};

const FRAMES: usize = 3;

fn main() -> Result<()> {
    let config = KnobConfig::load_or_default(CONFIG_FILE)?;
    init_logging(&config);

    let mut context = SettingsContext::with_config(&AppSettings::schema_with_constants(), config)
        .context("Failed to build the settings context")?;

    let mut args = std::env::args().skip(1);
    if args.next().as_deref() == Some("header") {
        let header = match args.next().as_deref() {
            None => context.default_shader_header(),
            Some("hlsl") => context.shader_header(ShaderLanguage::Hlsl),
            Some("wgsl") => context.shader_header(ShaderLanguage::Wgsl),
            Some(other) => return Err(anyhow!("unknown shader language '{other}'")),
        };
        print!("{header}");
        return Ok(());
    }

    // MSAA is chosen at startup by this renderer; keep it out of the panel.
    context.set_visible("anti_aliasing.msaa_mode", false)?;

    let view = Mat4::look_at_rh(
        Vec3::new(0.0, 2.0, 8.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::Y,
    )
    .context("degenerate camera")?;
    context.set_view(view);

    let egui_ctx = egui::Context::default();
    for frame in 0..FRAMES {
        simulate_frame(&mut context, &egui_ctx, frame)?;
    }

    let snapshot: AppSettings = context.snapshot();
    let msaa = snapshot.anti_aliasing.msaa_mode;
    log::info!(
        "Sandbox: exposure {:.1} EV, {} MSAA sample(s), {} packed bytes",
        snapshot.post_processing.exposure,
        msaa.num_samples(),
        context.front_buffer().len()
    );
    if msaa == MsaaModes::MsaaNone {
        log::debug!("Sandbox: MSAA disabled");
    }
    Ok(())
}

fn simulate_frame(context: &mut SettingsContext, egui_ctx: &egui::Context, frame: usize) -> Result<()> {
    let mut events = Vec::new();
    let _ = egui_ctx.run(egui::RawInput::default(), |ctx| {
        egui::SidePanel::left("settings").show(ctx, |ui| {
            let mut backend = EguiBackend::new(ui);
            events = context.render_ui(&mut backend);
        });
    });
    for event in &events {
        log::debug!("Sandbox: {event:?}");
    }

    // Scripted edits standing in for user input.
    match frame {
        0 => {
            context.propose("post_processing.exposure", -12.34f32)?;
            context.invoke("scene.clear_decals")?;
        }
        1 => {
            let accepted = context.propose("rendering.max_light_clamp", 100)?;
            if accepted.adjusted {
                log::info!("Sandbox: Max lights clamped to {:?}", accepted.value);
            }
        }
        _ => {}
    }

    if context.pressed("scene.clear_decals") {
        log::info!("Sandbox: Clearing decals");
    }
    if context.changed("post_processing.exposure") {
        log::info!(
            "Sandbox: Exposure is now {:?}",
            context.float("post_processing.exposure")
        );
    }

    let bytes = context.prepare_frame();
    log::debug!("Sandbox: Frame {frame} uploads {} bytes", bytes.len());
    context.end_frame();
    Ok(())
}
