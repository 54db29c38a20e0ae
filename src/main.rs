//! bdrc-outline CLI: flatten BDRC outlines into annotated documents.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use bdrc_outline::cache::FsDocumentCache;
use bdrc_outline::config::Config;
use bdrc_outline::outline::{
    DocumentOptions, OutlineProcessor, ProcessedOutline, RawPart, build_document, export_public,
    extract_parts, filter_public_view,
};
use bdrc_outline::paths::AppPaths;
use bdrc_outline::rdf::source::{HttpGraphSource, instances_of_work, works_of_instance};
use bdrc_outline::search::{HttpPageFetcher, related_instance_ids};

#[derive(Parser)]
#[command(
    name = "bdrc-outline",
    version,
    about = "Flatten BDRC outline metadata into position-annotated documents"
)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/bdrc-outline/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for cached documents.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with default settings.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },

    /// Fetch and process one outline.
    Outline {
        /// Outline id, e.g. O2DB80610.
        id: String,

        /// Also write the public document to DIR/<id>.json.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// File with the real text content; positions are scaled to it.
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Process the first outline of an instance.
    Instance {
        /// Instance id, e.g. MW22084.
        id: String,

        #[arg(long)]
        output_dir: Option<PathBuf>,

        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Format raw part records from a JSON file, offline.
    Format {
        /// JSON array of part records.
        records: PathBuf,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<PathBuf>,

        /// Print the public view instead of the full document.
        #[arg(long)]
        public: bool,
    },

    /// Print a cached document.
    Show {
        /// Outline id.
        id: String,

        #[arg(long)]
        public: bool,
    },

    /// List the works an instance realizes.
    Works {
        instance_id: String,
    },

    /// List the instances of a work.
    Instances {
        work_id: String,
    },

    /// Scrape search results for instance ids.
    Search {
        query: String,

        /// Number of result pages to fetch.
        #[arg(long, default_value = "1")]
        pages: u32,

        /// Concurrent fetches (default: from config).
        #[arg(long)]
        workers: Option<usize>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.command {
        Commands::Init { .. } => Config::default(),
        _ => load_config(cli.config.as_deref())?,
    };

    match cli.command {
        Commands::Init { force } => {
            let path = match cli.config {
                Some(path) => path,
                None => AppPaths::resolve()?.config_file(),
            };
            if path.exists() && !force {
                return Err(miette::miette!(
                    help = "Pass --force to overwrite it.",
                    "config file already exists: {}",
                    path.display()
                ));
            }
            Config::default().save(&path)?;
            println!("Wrote default config to {}", path.display());
        }

        Commands::Outline {
            id,
            output_dir,
            content,
        } => {
            let source = HttpGraphSource::new(&config);
            let cache = open_cache(&config, cli.cache_dir)?;
            let options = with_content(config.document_options(), content.as_deref())?;
            let processor = OutlineProcessor::new(&source, &cache, options);
            let outline = processor.process_outline(&id)?;
            report(&outline, output_dir.as_deref())?;
        }

        Commands::Instance {
            id,
            output_dir,
            content,
        } => {
            let source = HttpGraphSource::new(&config);
            let cache = open_cache(&config, cli.cache_dir)?;
            let options = with_content(config.document_options(), content.as_deref())?;
            let processor = OutlineProcessor::new(&source, &cache, options);
            let outline = processor.process_instance(&id)?;
            report(&outline, output_dir.as_deref())?;
        }

        Commands::Format {
            records,
            title,
            content,
            public,
        } => {
            let data = std::fs::read_to_string(&records).into_diagnostic()?;
            let raw: Vec<RawPart> = serde_json::from_str(&data).into_diagnostic()?;
            let options = DocumentOptions {
                title,
                ..with_content(config.document_options(), content.as_deref())?
            };
            let document = build_document(extract_parts(raw), options)?;
            let document = if public {
                filter_public_view(&document)
            } else {
                document
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&document).into_diagnostic()?
            );
        }

        Commands::Show { id, public } => {
            let source = HttpGraphSource::new(&config);
            let cache = open_cache(&config, cli.cache_dir)?;
            let processor =
                OutlineProcessor::new(&source, &cache, config.document_options());
            match processor.cached(&id, public)? {
                Some(document) => println!(
                    "{}",
                    serde_json::to_string_pretty(&document).into_diagnostic()?
                ),
                None => {
                    return Err(miette::miette!(
                        help = "Run `bdrc-outline outline <ID>` first.",
                        "no cached document for outline {id}"
                    ));
                }
            }
        }

        Commands::Works { instance_id } => {
            let source = HttpGraphSource::new(&config);
            let works = works_of_instance(&source, &instance_id)?;
            if works.is_empty() {
                println!("No works found for {instance_id}.");
            }
            for id in works {
                println!("{id}");
            }
        }

        Commands::Instances { work_id } => {
            let source = HttpGraphSource::new(&config);
            let instances = instances_of_work(&source, &work_id)?;
            if instances.is_empty() {
                println!("No instances found for {work_id}.");
            }
            for id in instances {
                println!("{id}");
            }
        }

        Commands::Search {
            query,
            pages,
            workers,
        } => {
            let fetcher = HttpPageFetcher::new(&config);
            let workers = workers.unwrap_or(config.workers);
            let ids = related_instance_ids(&fetcher, &query, pages, workers)?;
            println!("Found {} instance ids for \"{query}\":", ids.len());
            for id in ids {
                println!("  {id}");
            }
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => Config::load(path)?,
        None => match AppPaths::resolve() {
            Ok(paths) => Config::load_or_default(&paths.config_file())?,
            Err(e) => {
                tracing::debug!(error = %e, "no XDG paths, using default config");
                Config::default()
            }
        },
    };
    Ok(config)
}

/// `--cache-dir`, then the config's `cache_dir`, then the XDG cache dir.
fn open_cache(config: &Config, cli_dir: Option<PathBuf>) -> Result<FsDocumentCache> {
    let dir = match cli_dir.or_else(|| config.cache_dir.clone()) {
        Some(dir) => dir,
        None => {
            let paths = AppPaths::resolve()?;
            paths.ensure_dirs()?;
            paths.documents_dir()
        }
    };
    std::fs::create_dir_all(&dir).into_diagnostic()?;
    Ok(FsDocumentCache::new(dir))
}

fn with_content(options: DocumentOptions, content: Option<&Path>) -> Result<DocumentOptions> {
    let content = match content {
        Some(path) => Some(std::fs::read_to_string(path).into_diagnostic()?),
        None => None,
    };
    Ok(DocumentOptions { content, ..options })
}

fn report(outline: &ProcessedOutline, output_dir: Option<&Path>) -> Result<()> {
    println!(
        "Processed outline {}: {} annotations, {} characters",
        outline.outline_id,
        outline.full.annotations.len(),
        outline.full.text.content.chars().count()
    );
    if let Some(dir) = output_dir {
        let path = export_public(outline, dir)?;
        println!("Saved public document to {}", path.display());
    }
    Ok(())
}
