/// Ribbon Terminal Viewer
///
/// Renders the ribbon surface as ASCII art.
/// Controls:
///   - Mouse drag / Arrow Keys: Rotate the view
///   - F: Toggle detailed sampling
///   - WASD: Move the user point (textured variant)
///   - [ / ]: Turn the texture
///   - R: Reset the view
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use ribbon_core::{ControlState, RenderConfig, SurfaceVariant};
use ribbon_terminal::TerminalApp;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ribbon-terminal", about = "Render the ribbon surface in the terminal")]
struct Args {
    /// Draw the textured triangle strip with a user point marker
    #[arg(long)]
    textured: bool,

    /// Start with detailed sampling
    #[arg(long)]
    detailed: bool,

    /// Light position, e.g. `--light 0,10,10`
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    light: Vec<f32>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            RenderConfig::from_json(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => RenderConfig::default(),
    };

    let mut controls = ControlState::new(config.scene.light_position);
    controls.detailed = args.detailed;
    if !args.light.is_empty() {
        controls.set_light_fields(&args.light);
    }

    let variant = if args.textured {
        SurfaceVariant::Textured
    } else {
        SurfaceVariant::Shaded
    };

    log::info!("starting terminal viewer ({:?})", variant);
    let mut app = TerminalApp::new(config, variant, controls).context("failed to start renderer")?;
    app.run()?;

    Ok(())
}
