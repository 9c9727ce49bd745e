use clap::{Parser, Subcommand};
use simple_lightbox::gallery::{ImageCandidate, ImageElement};
use simple_lightbox::{config, markup, output, session};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-lightbox")]
#[command(about = "Image lightbox for photography pages")]
#[command(long_about = "\
Image lightbox for photography pages

Clicking an image inside the page content opens it in a full-screen overlay
at the largest size its srcset offers. Ctrl+wheel (or pinch) zooms between
0.5x and 3x, dragging pans while zoomed, arrow keys and the on-screen arrows
move through every large image on the page, Escape closes.

This tool prints the overlay markup, builds demo pages, shows which source
the lightbox would pick for an image, and replays recorded sessions.

Run 'simple-lightbox gen-config' to generate a documented lightbox.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing lightbox.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the overlay markup fragment
    Overlay {
        /// Also print the stylesheet
        #[arg(long)]
        css: bool,
    },
    /// Write a standalone page showing the given images with the lightbox
    Demo {
        /// Image URLs, optionally as URL=WIDTHxHEIGHT (default 1200x800)
        #[arg(required = true)]
        images: Vec<String>,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// URL of the wasm-bindgen module (built with `--target web`) to load
        #[arg(long)]
        script: Option<String>,
    },
    /// Show which source the lightbox would display for an image
    Resolve {
        /// The image's src
        src: String,
        /// The image's srcset attribute
        #[arg(long)]
        srcset: Option<String>,
    },
    /// Replay a recorded session and print what the lightbox does
    Replay {
        /// Session JSON file
        session: PathBuf,
        /// Print the trace as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock lightbox.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Overlay { css } => {
            println!("{}", markup::overlay().into_string());
            if css {
                let config = config::load_config(&cli.config)?;
                println!("<style>\n{}\n</style>", markup::stylesheet(&config));
            }
        }
        Command::Demo {
            images,
            output,
            script,
        } => {
            let config = config::load_config(&cli.config)?;
            let elements: Vec<ImageElement> =
                images.iter().map(String::as_str).map(parse_image_arg).collect();
            let html = markup::demo_page(&elements, &config, script.as_deref()).into_string();
            match output {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    println!("Demo page written to {}", path.display());
                }
                None => println!("{}", html),
            }
        }
        Command::Resolve { src, srcset } => {
            let mut element = ImageElement::new(src, 0, 0);
            element.srcset = srcset;
            output::print_resolve(&ImageCandidate::from(&element));
        }
        Command::Replay { session, json } => {
            let config = config::load_config(&cli.config)?;
            let recorded = session::load_session(&session)?;
            let replay = session::replay(&recorded, &config);
            if json {
                println!("{}", serde_json::to_string_pretty(&replay)?);
            } else {
                output::print_replay(&replay);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Parse `url` or `url=WIDTHxHEIGHT` into a page image. A trailing `=...`
/// that is not a size is treated as part of the URL.
fn parse_image_arg(arg: &str) -> ImageElement {
    let sized = arg.rsplit_once('=').and_then(|(url, size)| {
        let (w, h) = size.split_once('x')?;
        Some((url, w.parse::<u32>().ok()?, h.parse::<u32>().ok()?))
    });
    match sized {
        Some((url, width, height)) => ImageElement::new(url, width, height),
        None => ImageElement::new(arg, 1200, 800),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_arg_with_size() {
        let image = parse_image_arg("photo.jpg=640x480");
        assert_eq!(image, ImageElement::new("photo.jpg", 640, 480));
    }

    #[test]
    fn image_arg_without_size_uses_default() {
        assert_eq!(
            parse_image_arg("photo.jpg"),
            ImageElement::new("photo.jpg", 1200, 800)
        );
    }

    #[test]
    fn query_string_is_not_a_size() {
        assert_eq!(
            parse_image_arg("photo.jpg?w=800").src,
            "photo.jpg?w=800"
        );
    }
}
