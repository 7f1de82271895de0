use clap::{Parser, Subcommand};
use picture_table::config::{self, GallerySettings};
use picture_table::events::Reporter;
use picture_table::imaging::{ImageBackend, RustBackend};
use picture_table::output::{self, EventPrinter};
use picture_table::types::FooterKind;
use picture_table::{generate, scan};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "picture-table")]
#[command(about = "Turn a folder of images into a static HTML picture table")]
#[command(long_about = "\
Turn a folder of images into a static HTML picture table

Every JPEG, PNG and BMP directly inside the source folder becomes one cell of
a table, optionally shown through a generated thumbnail, with a footer under
each image. The page is written as index.html next to the images.

Folder structure:

  photos/
  ├── picture-table.toml    # Settings (optional)
  ├── dawn.jpg
  ├── dawn.txt              # Caption for the custom footer (optional)
  ├── dusk.png
  ├── index.html            # Written by 'build'
  ├── gallery.zip           # Written when the archive is enabled
  └── thumbnails/           # Written when thumbnails are enabled
      ├── dawn.jpg
      └── dusk.png

Footers: nothing, image_name, numbering (\"2 of 5\"), file_details, custom.

Run 'picture-table gen-config' to generate a documented picture-table.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Image folder (defaults to the current directory)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Settings file (.toml or .json) instead of <source>/picture-table.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Diagnostic log level: trace, debug, info, warn, error
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for a single build.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Images per table row
    #[arg(long)]
    columns: Option<usize>,

    /// Text under each image
    #[arg(long, value_enum)]
    footer: Option<FooterKind>,

    /// Link the originals directly instead of generating thumbnails
    #[arg(long)]
    no_thumbnails: bool,

    /// Bundle the images into an archive with this name
    #[arg(long)]
    archive: Option<String>,

    /// Open the page when done
    #[arg(long)]
    open: bool,
}

impl BuildArgs {
    fn apply(&self, settings: &mut GallerySettings) {
        if let Some(columns) = self.columns {
            settings.layout.columns = columns;
        }
        if let Some(footer) = self.footer {
            settings.layout.footer = footer;
        }
        if self.no_thumbnails {
            settings.thumbnails.enabled = false;
        }
        if let Some(name) = &self.archive {
            settings.archive.enabled = true;
            settings.archive.name = name.clone();
        }
        if self.open {
            settings.open_page = true;
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Generate thumbnails, the table page and the optional archive
    Build(BuildArgs),
    /// List the images and settings a build would use
    Scan,
    /// Validate settings and images without writing anything
    Check,
    /// Print a stock picture-table.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.command {
        Command::Build(args) => {
            let mut settings = load_settings(&cli)?;
            args.apply(&mut settings);
            settings.validate()?;

            println!("==> Building {}", settings.source.display());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                let mut printer = EventPrinter::new();
                for event in rx {
                    printer.print(&event);
                }
            });
            let reporter = Reporter::new(tx);
            let result = generate::run(&RustBackend::new(), &settings, &reporter);
            drop(reporter);
            printer.join().map_err(|_| "event printer panicked")?;

            output::print_build_output(&result?);
        }
        Command::Scan => {
            let settings = load_settings(&cli)?;
            let entries = scan::scan(&settings.source, &settings)?;
            output::print_scan_output(&entries, &settings);
        }
        Command::Check => {
            let settings = load_settings(&cli)?;
            println!("==> Checking {}", settings.source.display());
            let entries = scan::scan(&settings.source, &settings)?;
            output::print_scan_output(&entries, &settings);

            let backend = RustBackend::new();
            let unreadable: Vec<String> = entries
                .iter()
                .filter(|e| e.export)
                .filter_map(|e| {
                    backend
                        .identify(&e.path)
                        .err()
                        .map(|err| format!("{}: {err}", e.filename))
                })
                .collect();
            for line in &unreadable {
                eprintln!("error: {line}");
            }
            if !unreadable.is_empty() {
                return Err(format!("{} unreadable image(s)", unreadable.len()).into());
            }
            println!("==> Settings and images are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Settings from `--config`, or from the source folder's settings file.
///
/// An explicit `--source` always wins over the `source` of a settings file.
fn load_settings(cli: &Cli) -> Result<GallerySettings, config::ConfigError> {
    let mut settings = match &cli.config {
        Some(path) => config::load_settings_file(path)?,
        None => config::load_settings(cli.source.as_deref().unwrap_or(Path::new(".")))?,
    };
    if let Some(source) = &cli.source {
        settings.source = source.clone();
    }
    Ok(settings)
}
