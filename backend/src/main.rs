//! TeamTrack CLI - resource bulk import, template and export tooling
//!
//! # Main Commands
//!
//! ```bash
//! teamtrack serve                    # Start HTTP server (port 3000)
//! teamtrack import staff.csv        # Validate a file, print the preview
//! teamtrack import staff.csv --commit  # ...and submit valid rows to the store
//! teamtrack template                 # Print the import template CSV
//! teamtrack export -o out.csv       # Export stored resources as CSV
//! ```
//!
//! The storage actor URL comes from `--store-url` or the
//! `TEAMTRACK_STORE_URL` environment variable; `serve` falls back to an
//! in-memory store (demo mode) when neither is set.

use clap::{Parser, Subcommand};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use teamtrack::server::{start_server, AppState};
use teamtrack::{
    parse_and_validate, resources_to_csv, run_import, sample_template_csv, AnyStore,
    HttpResourceStore, ResourceStore, SessionStore,
};

#[derive(Parser)]
#[command(name = "teamtrack")]
#[command(about = "TeamTrack resource bulk import backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Storage actor base URL (in-memory demo store if omitted)
        #[arg(long)]
        store_url: Option<String>,
    },

    /// Parse and validate a CSV/XLSX file, printing the preview
    Import {
        /// Input file (.csv, .xlsx or .xls)
        input: PathBuf,

        /// Submit the valid rows to the storage actor
        #[arg(long)]
        commit: bool,

        /// Storage actor base URL (required with --commit)
        #[arg(long)]
        store_url: Option<String>,
    },

    /// Print or write the import template CSV
    Template {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export stored resources as CSV
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Storage actor base URL
        #[arg(long)]
        store_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port, store_url } => cmd_serve(port, resolve_store_url(store_url)).await,

        Commands::Import { input, commit, store_url } => {
            cmd_import(&input, commit, resolve_store_url(store_url)).await
        }

        Commands::Template { output } => write_output(&sample_template_csv(), output.as_deref()),

        Commands::Export { output, store_url } => {
            cmd_export(output.as_deref(), resolve_store_url(store_url)).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn resolve_store_url(flag: Option<String>) -> Option<String> {
    flag.or_else(|| env::var("TEAMTRACK_STORE_URL").ok())
}

async fn cmd_serve(port: u16, store_url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    match &store_url {
        Some(url) => eprintln!("Using storage actor at {}", url),
        None => eprintln!("No store URL configured; using in-memory demo store"),
    }

    let state = AppState {
        store: AnyStore::from_url(store_url),
        sessions: SessionStore::new(),
    };
    start_server(port, state).await
}

async fn cmd_import(
    input: &Path,
    commit: bool,
    store_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv")
        .to_string();
    let bytes = fs::read(input)?;

    if commit {
        let url = store_url.ok_or(
            "a store URL is required with --commit (use --store-url or TEAMTRACK_STORE_URL)",
        )?;
        let store = HttpResourceStore::new(url);
        let (parsed, summary) = run_import(&bytes, &file_name, &store).await?;
        print_preview(&parsed);
        match summary {
            Some(s) => {
                eprintln!("\nImported {} of {} records ({} skipped)", s.success, s.total, s.failed)
            }
            None => eprintln!("\nNo valid records to import; nothing submitted"),
        }
        return Ok(());
    }

    let parsed = parse_and_validate(&bytes, &file_name)?;
    print_preview(&parsed);
    Ok(())
}

fn print_preview(parsed: &teamtrack::ParsedImport) {
    eprintln!("Rows: {} ({} valid, {} with errors)", parsed.rows.len(), parsed.valid_count(), parsed.invalid_count());

    for outcome in parsed.rows.iter().filter(|o| !o.is_valid()) {
        eprintln!("  Row {}: {}", outcome.line, outcome.errors.join(", "));
    }
}

async fn cmd_export(
    output: Option<&Path>,
    store_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = store_url
        .ok_or("a store URL is required for export (use --store-url or TEAMTRACK_STORE_URL)")?;
    let store = HttpResourceStore::new(url);

    let resources = store.fetch_resources().await?;
    eprintln!("Fetched {} resources", resources.len());

    write_output(&resources_to_csv(&resources), output)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
