/// objview terminal preview
///
/// Usage: objview-terminal [--config=FILE] [--scale=S] [OBJ...]
///
/// Controls:
///   - W/S, Up/Down: orbit about x
///   - A/D, Left/Right: orbit about y
///   - E/R: orbit about z
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use objview_core::{ModelSource, ModelTransform, ViewerConfig};
use objview_terminal::{load_models, SceneModel, TerminalApp};

struct Args {
    config: Option<String>,
    scale: f32,
    paths: Vec<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: None,
        scale: 1.0,
        paths: Vec::new(),
    };
    for arg in std::env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            args.config = Some(path.to_string());
        } else if let Some(value) = arg.strip_prefix("--scale=") {
            match value.parse::<f32>() {
                Ok(scale) => args.scale = scale,
                Err(_) => log::warn!("ignoring invalid scale {:?}", value),
            }
        } else {
            args.paths.push(arg);
        }
    }
    args
}

fn build_config(args: &Args) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config: {}", path))?;
            ViewerConfig::from_json(&text).with_context(|| format!("parse config: {}", path))?
        }
        None => ViewerConfig {
            models: Vec::new(),
            ..ViewerConfig::default()
        },
    };

    if !args.paths.is_empty() {
        let transform = ModelTransform {
            scale: args.scale,
            ..ModelTransform::default()
        };
        config.models = args
            .paths
            .iter()
            .map(|path| ModelSource {
                source: path.clone(),
                transform,
            })
            .collect();
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args();
    let config = build_config(&args)?;

    let models = if config.models.is_empty() {
        log::info!("no models given, showing the built-in cube");
        vec![SceneModel::cube()?]
    } else {
        load_models(&config)?
    };

    let mut app = TerminalApp::new(models, config.perspective)?;
    app.run()?;

    Ok(())
}
