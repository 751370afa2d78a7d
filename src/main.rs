//! Snekkja - A terminal image gallery.
//!
//! # Usage
//!
//! ```bash
//! snekkja ~/Pictures/trip
//! snekkja --title "Summer 2024" --thumb-size 64 photos/
//! snekkja --manifest photos/ > gallery.json
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use snekkja::app::App;
use snekkja::config::{
    ConfigFlags, GALLERY_CONFIG_FILE, GalleryConfig, clear_config_flags, global_config_path,
    load_config_flags, local_override_path, parse_flag_tokens, save_config_flags,
    write_default_gallery_config,
};
use snekkja::gallery::Gallery;
use snekkja::gallery::manifest::Manifest;
use snekkja::perf;

/// A terminal image gallery with a scrolling thumbnail strip
#[derive(Parser, Debug)]
#[command(name = "snekkja", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Directory containing the images
    #[arg(value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Gallery settings file (defaults to DIR/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a default settings file to DIR/config.toml (or --config) and exit
    #[arg(long)]
    write_config: bool,

    /// Print the gallery as JSON and exit
    #[arg(long)]
    manifest: bool,

    /// Gallery title shown above the image
    #[arg(long, value_name = "TEXT")]
    title: Option<String>,

    /// Thumbnail size in pixels
    #[arg(long, value_name = "PX")]
    thumb_size: Option<u32>,

    /// Caption for images without one
    #[arg(long, value_name = "TEXT")]
    default_caption: Option<String>,

    /// Disable image rendering (show file names only)
    #[arg(long)]
    no_images: bool,

    /// Force image rendering to use half-cell fallback mode
    #[arg(long)]
    force_half_cell: bool,

    /// Do not decode the whole gallery in the background
    #[arg(long)]
    no_preload: bool,

    /// Enable startup performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed navigation/render/image debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("SNEKKJA_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            path = ?render_debug_log_path,
            %err,
            "failed to initialize render debug log"
        );
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.dir.join(GALLERY_CONFIG_FILE));

    if cli.write_config {
        if config_path.exists() {
            anyhow::bail!("Refusing to overwrite {}", config_path.display());
        }
        write_default_gallery_config(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    if !cli.dir.is_dir() {
        anyhow::bail!("Directory not found: {}", cli.dir.display());
    }

    let config = GalleryConfig::load_or_default(&config_path)?.with_overrides(&effective);
    let gallery = {
        let _scope = perf::scope("main.load_gallery");
        Gallery::load(&cli.dir, &config)
            .with_context(|| format!("Failed to load gallery from {}", cli.dir.display()))?
    };
    tracing::debug!(
        images = gallery.len(),
        captions = gallery.captions().len(),
        "gallery loaded"
    );

    if cli.manifest {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        Manifest::from(&gallery)
            .write_to(&mut out, config.pretty_json)
            .context("Failed to write manifest")?;
        out.flush()?;
        return Ok(());
    }

    // Run the application
    let app = App::new(gallery)
        .with_images_enabled(!effective.no_images)
        .with_force_half_cell(effective.force_half_cell)
        .with_preload(!effective.no_preload)
        .with_config_paths(
            Some(global_path),
            if local_path.exists() {
                Some(local_path)
            } else {
                None
            },
        );

    app.run().context("Application error")
}
