mod script;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_assets::{
    LoadedAsset, MemoryFetcher, ResourceLoader, Source, default_manifest, fetcher_for, load_manifest, resolve,
};
use folio_common::Viewport;
use folio_render::DebugTextRenderer;
use folio_tools::{FrameTimer, SceneInspector};
use folio_world::{Experience, ExperienceSettings};
use tracing_subscriber::EnvFilter;

use crate::script::Script;

/// Simulated frame length.
const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser)]
#[command(name = "folio-cli", about = "Headless tools for the folio scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct AssetArgs {
    /// Asset manifest (JSON or YAML). The site's own list is used when omitted.
    #[arg(long)]
    manifest: Option<String>,

    /// Directory or http(s) URL the manifest paths are relative to
    #[arg(long, default_value = "./static")]
    asset_base: String,
}

impl AssetArgs {
    fn sources(&self) -> Result<Vec<Source>> {
        match &self.manifest {
            Some(path) => load_manifest(path).with_context(|| format!("reading manifest {path}")),
            None => Ok(default_manifest()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Fetch and decode every source of a manifest and report each outcome
    Validate {
        #[command(flatten)]
        assets: AssetArgs,
    },
    /// Build the scene headlessly and play a scroll/pointer script against it
    Simulate {
        #[command(flatten)]
        assets: AssetArgs,
        /// Script file (JSON or YAML); a tour of every page when omitted
        #[arg(long)]
        script: Option<String>,
        /// Frames to run; defaults to one second past the last scripted step
        #[arg(long)]
        frames: Option<u32>,
        /// Print a frame listing every N frames (0: only the last frame)
        #[arg(long, default_value = "0")]
        every: u32,
        #[arg(long, default_value = "1920")]
        width: f32,
        #[arg(long, default_value = "1080")]
        height: f32,
        /// Start in the dark theme
        #[arg(long)]
        dark: bool,
    },
}

fn describe(asset: &LoadedAsset) -> String {
    match asset {
        LoadedAsset::Model(model) => format!(
            "model: {} nodes, {} clips, digest {}",
            model.nodes.len(),
            model.animations.len(),
            model.digest
        ),
        LoadedAsset::Texture(texture) => format!(
            "texture: {}x{}, digest {}",
            texture.width, texture.height, texture.digest
        ),
        LoadedAsset::CubeTexture(cube) => format!("cube texture: {} faces", cube.faces.len()),
    }
}

fn validate(assets: &AssetArgs) -> Result<()> {
    let sources = assets.sources()?;
    let fetcher = fetcher_for(&assets.asset_base)?;
    let mut failures = 0;
    for source in &sources {
        match resolve(source, fetcher.as_ref()) {
            Ok(asset) => println!("  ok    {:<20} {}", source.name, describe(&asset)),
            Err(e) => {
                failures += 1;
                println!("  FAIL  {:<20} {} ({e})", source.name, source.kind.label());
            }
        }
    }
    println!("{} sources, {} failed", sources.len(), failures);
    if failures > 0 {
        anyhow::bail!("{failures} of {} sources could not be loaded", sources.len());
    }
    Ok(())
}

struct SimulateOptions {
    script: Option<String>,
    frames: Option<u32>,
    every: u32,
    viewport: Viewport,
    dark: bool,
}

fn simulate(assets: &AssetArgs, options: SimulateOptions) -> Result<()> {
    let mut loader = ResourceLoader::new(fetcher_for(&assets.asset_base)?);
    if !loader.load_blocking(assets.sources()?)? {
        anyhow::bail!(
            "asset load failed: {}",
            loader.last_error().unwrap_or("unknown error")
        );
    }

    let settings = ExperienceSettings {
        prefers_dark: options.dark,
        ..ExperienceSettings::default()
    };
    // Assets are already resolved, so the experience's own loader stays idle.
    let mut experience = Experience::new(
        ResourceLoader::new(Arc::new(MemoryFetcher::new())),
        DebugTextRenderer::new(),
        options.viewport,
        settings,
    );
    experience.adopt_assets(loader.assets())?;

    let script = match &options.script {
        Some(path) => Script::load(path)?,
        None => Script::tour(options.viewport.height),
    };
    let frames = options.frames.unwrap_or(script.last_frame() + 60);
    tracing::info!(steps = script.len(), frames, "simulating");

    let mut timer = FrameTimer::default();
    let mut last = None;
    for frame in 0..frames {
        for event in script.events_at(frame) {
            experience.handle_event(event);
        }
        let started = std::time::Instant::now();
        let output = experience.tick(FRAME * frame)?;
        timer.record(started.elapsed());

        let print = options.every > 0 && frame % options.every == 0;
        if let Some(output) = output {
            if print {
                println!("--- frame {frame} ---\n{output}");
            }
            last = Some(output);
        }
    }

    if let Some(output) = last {
        println!("--- final frame ---\n{output}");
    }
    println!("{}", SceneInspector::summary(&experience));
    if let Some(label) = experience.label() {
        println!("Label: {label}");
    }
    println!("Tick cost: {:.3} ms average", timer.average().as_secs_f64() * 1000.0);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("folio-cli v{}", env!("CARGO_PKG_VERSION"));
            for info in [
                folio_common::crate_info(),
                folio_kernel::crate_info(),
                folio_input::crate_info(),
                folio_animation::crate_info(),
                folio_assets::crate_info(),
                folio_scene::crate_info(),
                folio_world::crate_info(),
                folio_render::crate_info(),
                folio_render_wgpu::crate_info(),
                folio_tools::crate_info(),
            ] {
                println!("  {info}");
            }
            println!("default manifest: {} sources", default_manifest().len());
        }
        Commands::Validate { assets } => validate(&assets)?,
        Commands::Simulate {
            assets,
            script,
            frames,
            every,
            width,
            height,
            dark,
        } => simulate(
            &assets,
            SimulateOptions {
                script,
                frames,
                every,
                viewport: Viewport::new(width, height, 1.0),
                dark,
            },
        )?,
    }

    Ok(())
}
