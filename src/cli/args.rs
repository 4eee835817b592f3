//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::CharacterSet;
use crate::ascii::{MAX_RESOLUTION, MIN_RESOLUTION};

/// Parse and validate sampling resolution (0.05-0.30)
fn parse_resolution(s: &str) -> Result<f64, String> {
    let resolution: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&resolution) {
        return Err(format!(
            "Resolution must be between {} and {}, got {}",
            MIN_RESOLUTION, MAX_RESOLUTION, resolution
        ));
    }
    Ok(resolution)
}

/// Convert images to ASCII art and deliver them by email
#[derive(Parser, Debug)]
#[command(name = "ascii-courier")]
#[command(version, about = "Image to ASCII art converter with email delivery", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image file to ASCII art
    Convert(ConvertArgs),
    /// Run the HTTP server
    Serve,
    /// Delete stored artifacts older than the retention window
    Sweep,
    /// List retrieval URLs of stored artifacts
    List,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(ClapArgs, Debug)]
pub struct ConvertArgs {
    /// Input image (PNG, JPEG, WebP, GIF or BMP)
    pub input: PathBuf,

    /// Write the rendered PNG here
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Write the text art here (default: stdout when no PNG is requested)
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Sampling resolution (0.05-0.30)
    #[arg(long, short, value_parser = parse_resolution)]
    pub resolution: Option<f64>,

    /// ASCII character set
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Invert brightness
    #[arg(long)]
    pub invert: bool,

    /// Keep source colors instead of white glyphs
    #[arg(long)]
    pub color: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_defaults() {
        let args = Args::parse_from(["ascii-courier", "convert", "cat.png"]);
        let Command::Convert(convert) = args.command else {
            panic!("expected convert subcommand");
        };
        assert_eq!(convert.input, PathBuf::from("cat.png"));
        assert!(convert.out.is_none());
        assert!(convert.text.is_none());
        assert!(convert.resolution.is_none());
        assert!(convert.charset.is_none());
        assert!(!convert.invert);
        assert!(!convert.color);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_convert_options() {
        let args = Args::parse_from([
            "ascii-courier",
            "convert",
            "cat.png",
            "--out",
            "cat-ascii.png",
            "--text",
            "cat.txt",
            "-r",
            "0.2",
            "--charset",
            "blocks",
            "--invert",
            "--color",
        ]);
        let Command::Convert(convert) = args.command else {
            panic!("expected convert subcommand");
        };
        assert_eq!(convert.out, Some(PathBuf::from("cat-ascii.png")));
        assert_eq!(convert.text, Some(PathBuf::from("cat.txt")));
        assert_eq!(convert.resolution, Some(0.2));
        assert_eq!(convert.charset, Some(CharacterSet::Blocks));
        assert!(convert.invert);
        assert!(convert.color);
    }

    #[test]
    fn test_resolution_out_of_range_rejected() {
        let result = Args::try_parse_from(["ascii-courier", "convert", "a.png", "-r", "0.5"]);
        assert!(result.is_err());

        let result = Args::try_parse_from(["ascii-courier", "convert", "a.png", "-r", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolution_bounds_accepted() {
        assert_eq!(parse_resolution("0.05"), Ok(0.05));
        assert_eq!(parse_resolution("0.3"), Ok(0.3));
        assert!(parse_resolution("0.04").is_err());
    }

    #[test]
    fn test_unknown_charset_rejected() {
        let result =
            Args::try_parse_from(["ascii-courier", "convert", "a.png", "--charset", "braille"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_store_subcommands() {
        let args = Args::parse_from(["ascii-courier", "serve"]);
        assert!(matches!(args.command, Command::Serve));

        let args = Args::parse_from(["ascii-courier", "sweep"]);
        assert!(matches!(args.command, Command::Sweep));

        let args = Args::parse_from(["ascii-courier", "list"]);
        assert!(matches!(args.command, Command::List));
    }

    #[test]
    fn test_global_config_option() {
        let args = Args::parse_from(["ascii-courier", "serve", "--config", "/tmp/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/config.toml")));

        let args = Args::parse_from(["ascii-courier", "-c", "/tmp/test.toml", "list"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
    }

    #[test]
    fn test_config_subcommands() {
        let args = Args::parse_from(["ascii-courier", "config", "show"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));

        let args = Args::parse_from(["ascii-courier", "config", "init"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Init
            }
        ));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["ascii-courier"]).is_err());
    }
}
