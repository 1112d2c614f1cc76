use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use stillframe::session::SessionRegistry;
use stillframe::settings::{AlbumSettings, LayoutMode, SelectionMode};

#[derive(Parser)]
#[command(name = "stillframe")]
#[command(about = "Photo slideshow engine for fixed-size viewports")]
#[command(long_about = "\
Photo slideshow engine for fixed-size viewports

Your filesystem is the data source. The root directory becomes the 'ALL'
album; each immediate subdirectory becomes an album of its own.

  photos/
  ├── skyline.jpg              # Part of ALL only
  ├── vacation/                # Album 'vacation'
  │   ├── 001-beach.jpg
  │   └── 002-dunes.jpg
  └── family/                  # Album 'family'
      └── dinner.png

Accepted files: jpg, jpeg, png, gif, bmp, webp up to 20 MiB, and only when
the file content matches the extension.")]
#[command(version)]
struct Cli {
    /// Photo collection root directory
    #[arg(long, default_value = "photos", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List discovered albums and their item counts
    Albums,
    /// Render the current image of an album to a file
    Render(RenderArgs),
    /// Print current media info for an album as JSON
    Info {
        /// Album id (directory name, or ALL)
        #[arg(long, default_value = "ALL")]
        album: String,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Album id (directory name, or ALL)
    #[arg(long, default_value = "ALL")]
    album: String,

    /// Viewport width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// How to fit the image to the viewport
    #[arg(long, value_enum, default_value_t = LayoutArg::Original)]
    layout: LayoutArg,

    /// Selection mode for this album
    #[arg(long, value_enum, default_value_t = ModeArg::Sequential)]
    mode: ModeArg,

    /// Advance the selection before rendering
    #[arg(long)]
    next: bool,

    /// Output file; the extension should match the encoded format
    #[arg(long, default_value = "still.jpg")]
    out: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Original,
    Crop,
    Combined,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Original => LayoutMode::Original,
            LayoutArg::Crop => LayoutMode::Crop,
            LayoutArg::Combined => LayoutMode::Combined,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Random,
    Sequential,
}

impl From<ModeArg> for SelectionMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Random => SelectionMode::Random,
            ModeArg::Sequential => SelectionMode::Sequential,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let registry = SessionRegistry::new(cli.root.clone(), AlbumSettings::default())?;

    match cli.command {
        Command::Albums => {
            for summary in registry.albums() {
                println!("{:<20} {:>5} items   {}", summary.id, summary.item_count, summary.title);
            }
        }
        Command::Render(args) => {
            let session = registry.session(&args.album);
            session.set_mode(args.mode.into());
            session.set_layout(args.layout.into());
            if args.next {
                session.advance_selection(None);
            }

            match session.still_image(args.width, args.height)? {
                Some(bytes) => {
                    std::fs::write(&args.out, &bytes)?;
                    println!("{} ({} bytes)", args.out.display(), bytes.len());
                }
                None => {
                    eprintln!("No image available in album '{}'", args.album);
                    std::process::exit(1);
                }
            }
        }
        Command::Info { album } => match registry.current_media_info(&album) {
            Some(info) => println!("{}", serde_json::to_string_pretty(&info)?),
            None => {
                eprintln!("No media selected in album '{album}'");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
