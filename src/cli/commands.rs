//! Subcommand handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::args::{ConfigAction, ConvertArgs};
use crate::ascii::{self, ConversionConfig, ConvertError, SourceImage};
use crate::config::{default_path, Config, ConfigError};
use crate::render::{self, CellMetrics, FontRaster, RenderError, FONT_SIZE};
use crate::server::{self, ServerError};
use crate::store::{ArtifactStore, StoreError};

/// Errors surfaced by subcommands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),
}

/// Merge CLI flags over the configured conversion defaults.
pub fn conversion_settings(base: ConversionConfig, args: &ConvertArgs) -> ConversionConfig {
    let mut config = base;
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    if let Some(charset) = args.charset {
        config.charset = charset.into();
    }
    if args.invert {
        config.invert = true;
    }
    if args.color {
        config.grayscale = false;
    }
    config
}

/// Convert one image file, writing text and/or PNG output.
///
/// With neither `--out` nor `--text`, the text art goes to stdout.
pub fn run_convert(config: &Config, args: &ConvertArgs) -> Result<(), CommandError> {
    let bytes = std::fs::read(&args.input).map_err(|source| CommandError::Read {
        path: args.input.clone(),
        source,
    })?;
    let image = SourceImage::decode(&bytes)?;
    let settings = conversion_settings(config.conversion, args);
    let frame = ascii::convert(&image, &settings)?;

    log::info!(
        "Converted {} ({}x{}) to {}x{} glyphs",
        args.input.display(),
        image.width(),
        image.height(),
        frame.columns(),
        frame.row_count()
    );

    let text = frame.to_text();
    match &args.text {
        Some(path) => write_file(path, text.as_bytes())?,
        None if args.out.is_none() => print!("{}", text),
        None => {}
    }

    if let Some(out) = &args.out {
        let raster = FontRaster::load(config.render.font_path.as_deref(), FONT_SIZE)?;
        let png = render::render_png(&frame, &raster, CellMetrics::default())?;
        write_file(out, &png)?;
        println!("Wrote {}", out.display());
    }

    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), CommandError> {
    std::fs::write(path, contents).map_err(|source| CommandError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn store_from_config(config: &Config) -> ArtifactStore {
    ArtifactStore::new(
        config.store.effective_dir(),
        config.server.effective_base_url(),
    )
}

/// Run the HTTP server on a fresh tokio runtime.
pub fn run_serve(config: &Config) -> Result<(), CommandError> {
    let raster = FontRaster::load(config.render.font_path.as_deref(), FONT_SIZE)?;
    let runtime = tokio::runtime::Runtime::new().map_err(CommandError::Runtime)?;
    runtime.block_on(server::serve(config, Arc::new(raster)))?;
    Ok(())
}

/// Sweep expired artifacts once.
pub fn run_sweep(config: &Config) -> Result<(), CommandError> {
    let store = store_from_config(config);
    let report = store.sweep()?;
    println!(
        "Deleted {} expired artifact(s) from {}",
        report.deleted_count,
        store.dir().display()
    );
    if report.skipped_count > 0 {
        println!(
            "Skipped {} file(s) without a timestamp in their name",
            report.skipped_count
        );
    }
    Ok(())
}

/// Print the retrieval URL of every stored artifact.
pub fn run_list(config: &Config) -> Result<(), CommandError> {
    let store = store_from_config(config);
    let urls = store.list()?;
    if urls.is_empty() {
        println!("No stored artifacts in {}", store.dir().display());
    } else {
        for url in urls {
            println!("{}", url);
        }
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config: &Config,
    config_path: Option<&Path>,
) -> Result<(), CommandError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!();
            print!("{}", config.redacted().to_toml()?);
            println!();
            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
            println!("Artifact directory: {}", config.store.effective_dir().display());
            println!("Download links: {}", config.server.effective_base_url());
        }
        ConfigAction::Init => {
            if path.exists() {
                eprintln!("Use 'ascii-courier config show' to view current settings.");
                return Err(CommandError::ConfigExists(path));
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| CommandError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            let contents = format!(
                "# ascii-courier configuration\n# Secrets are better kept in .env (MAIL_API_KEY, EMAIL_USER).\n\n{}",
                Config::default().to_toml()?
            );
            write_file(&path, contents.as_bytes())?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}
