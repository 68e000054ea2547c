//! Gallery launcher: picks a scene by name and runs it in a render session.

mod scenes;

use anyhow::bail;
use log::info;

use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::session::RenderSession;
use glint_engine::window::{Runtime, RuntimeConfig};

use scenes::MeshScene;

fn pick_scene(name: &str) -> Option<MeshScene> {
    match name {
        "plane" => Some(scenes::plane()),
        "cube" => Some(scenes::cube()),
        "textured-cube" => Some(scenes::textured_cube()),
        _ => None,
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let requested = std::env::args().nth(1).unwrap_or_else(|| "cube".to_string());
    let Some(scene) = pick_scene(&requested) else {
        bail!("unknown scene {requested:?}; available: plane, cube, textured-cube");
    };

    info!("starting scene {:?}", scene.name());
    let config = RuntimeConfig {
        title: format!("glint: {}", scene.name()),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, RenderSession::new(scene))
}
