//! Binary entry point. Without a subcommand it opens the library in the
//! terminal UI; the subcommands cover scripted import, listing and export.
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use lyric_binder::config::Config;
use lyric_binder::export::ExportFormat;
use lyric_binder::logging::{init_logging, LogTarget};
use lyric_binder::{import_file, run_app, write_exports, App, Library, Song};

/// Lyric Binder - draft lyrics with alternative wordings per word
#[derive(Parser, Debug)]
#[command(name = "lyric-binder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Draft song lyrics with alternative wordings", long_about = None)]
struct Args {
    /// Directory holding the library, config.toml and the log file
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a plain-text lyric file and make it the current song
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Use this title instead of the detected one
        #[arg(long)]
        title: Option<String>,
    },

    /// List saved songs, most recently modified first
    List,

    /// Print a song (the current one by default)
    Show {
        id: Option<String>,

        /// Annotate words with their alternatives
        #[arg(short, long)]
        alternatives: bool,
    },

    /// Write both text exports of a song (the current one by default)
    Export {
        id: Option<String>,

        /// Output directory; defaults to the configured export directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Delete a song from the library
    Delete { id: String },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.data_dir)?;

    let target = match args.command {
        Some(_) => LogTarget::Stderr,
        None => LogTarget::File(config.log_path()),
    };
    init_logging(&config.log_level, target)?;

    let mut library = Library::open(&config.database_path())?;
    info!("using library at {}", config.database_path().display());

    match args.command {
        None => {
            let mut app = App::new(library, &config);
            run_app(&mut app)
        }
        Some(Commands::Import { file, title }) => {
            let mut song = import_file(&file)?;
            if let Some(title) = title {
                song = song.with_title(title);
            }
            library.save(&song);
            library.set_current(&song.id);
            println!("{}  {}", song.id, song.title);
            Ok(())
        }
        Some(Commands::List) => {
            let current = library.current_id();
            for entry in library.list() {
                let marker = if current.as_deref() == Some(entry.id.as_str()) {
                    '*'
                } else {
                    ' '
                };
                println!(
                    "{marker} {}  {}  {}",
                    entry.id,
                    entry.last_modified.format("%Y-%m-%d %H:%M"),
                    entry.title
                );
            }
            Ok(())
        }
        Some(Commands::Show { id, alternatives }) => {
            let song = find_song(&library, id.as_deref())?;
            let format = if alternatives {
                ExportFormat::WithAlternatives
            } else {
                ExportFormat::Plain
            };
            print!("{}", format.render(&song));
            Ok(())
        }
        Some(Commands::Export { id, out }) => {
            let song = find_song(&library, id.as_deref())?;
            let dir = out.unwrap_or_else(|| config.export_dir.clone());
            for path in write_exports(&song, &dir)? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Some(Commands::Delete { id }) => {
            if !library.contains(&id) {
                bail!("no song with id {id}");
            }
            // Unreadable songs are deleted too; the index still knows the title.
            let title = library
                .list()
                .into_iter()
                .find(|entry| entry.id == id)
                .map_or_else(|| id.clone(), |entry| entry.title);
            library.delete(&id);
            println!("deleted \"{title}\"");
            Ok(())
        }
    }
}

/// Load the song with `id`, or the current song when no id is given.
fn find_song(library: &Library, id: Option<&str>) -> Result<Song> {
    match id {
        Some(id) => library
            .load(id)
            .with_context(|| format!("no song with id {id}")),
        None => match library.current() {
            Some(song) => Ok(song),
            None => bail!("no current song; pass an id (see `lyric-binder list`)"),
        },
    }
}
