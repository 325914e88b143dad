use engine::{resolve_app_paths, AppPaths, CameraError, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{ConfigError, GameConfig, CONFIG_RELATIVE_PATH};
use super::gameplay::Game;

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create game camera: {0}")]
    Camera(#[from] CameraError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) paths: AppPaths,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Pokemario Startup ===");

    let paths = resolve_app_paths()?;
    let game_config = GameConfig::load_or_default(&paths.assets_dir.join(CONFIG_RELATIVE_PATH))?;
    let config = loop_config(&game_config);
    let scene = Game::new(game_config)?;

    Ok(AppWiring {
        config,
        paths,
        scene: Box::new(scene),
    })
}

fn loop_config(game_config: &GameConfig) -> LoopConfig {
    let window = &game_config.window;
    LoopConfig {
        window_title: window.title.clone(),
        window_width: window.width,
        window_height: window.height,
        max_render_fps: window.max_render_fps,
        ..LoopConfig::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
