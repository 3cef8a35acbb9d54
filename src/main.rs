use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{error, info};

use hoverdoc::docs::{Doc, DocEngine};
use hoverdoc::logging::{LogConfig, init_logging};
use hoverdoc::packages::{DirImportResolver, RealFileSystem, SearchPaths};
use hoverdoc::program::ProgramSnapshot;

/// Documentation lookup for identifiers and packages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Source root for import resolution, repeatable (overrides GOROOT/GOPATH)
    #[arg(long = "root", value_name = "DIR", global = true)]
    roots: Vec<PathBuf>,

    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Log file path (overrides HOVERDOC_LOG_FILE env var)
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Documentation for the identifier at a byte offset of a source file
    Ident {
        /// Program snapshot (JSON) holding syntax trees and symbol tables
        #[arg(long, value_name = "FILE")]
        snapshot: PathBuf,

        /// Source file, as registered in the snapshot
        #[arg(long, value_name = "PATH")]
        file: PathBuf,

        /// Byte offset of the identifier's first character
        #[arg(long)]
        offset: usize,

        #[command(flatten)]
        output: Output,
    },
    /// Package documentation for an import path
    Package {
        import_path: String,

        /// Directory relative imports are resolved from
        #[arg(long, value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        output: Output,
    },
}

#[derive(ClapArgs, Debug)]
struct Output {
    /// Print the record as JSON
    #[arg(long, conflicts_with = "hover")]
    json: bool,

    /// Print an LSP hover (JSON)
    #[arg(long)]
    hover: bool,
}

impl Output {
    fn print(&self, doc: &Doc) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(doc)?);
        } else if self.hover {
            println!("{}", serde_json::to_string_pretty(&doc.to_hover())?);
        } else {
            print!("{doc}");
        }
        Ok(())
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let search_paths = SearchPaths::from_env().with_overrides(args.roots);
    info!("Import roots: {:?}", search_paths.roots());

    let fs = RealFileSystem;
    let engine = DocEngine::new(DirImportResolver::new(fs.clone(), search_paths), fs);

    match args.command {
        Command::Ident {
            snapshot,
            file,
            offset,
            output,
        } => {
            let program = ProgramSnapshot::load(&snapshot)?;
            let pos = program.pos_for(&file, offset).ok_or_else(|| {
                format!("{}:{} is not part of the snapshot", file.display(), offset)
            })?;
            output.print(&engine.ident_doc(&program, pos)?)?;
        }
        Command::Package {
            import_path,
            dir,
            output,
        } => {
            output.print(&engine.package_doc(&import_path, &dir)?)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_config =
        LogConfig::from_env().with_overrides(args.log_level.clone(), args.log_file.clone());
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
