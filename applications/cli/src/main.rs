/// Shelf - e-book library importer
use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_cli::{outcome_messages, ProgressRenderer, ShelfConfig};
use shelf_core::{CatalogEntry, CatalogStore, EntryKey, Selection};
use shelf_importer::{ImportManager, ImportPipeline};
use shelf_metadata::EpubMetadataExtractor;
use shelf_storage::{CatalogQuery, SqliteCatalog};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Import and browse an e-book library", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./shelf.toml when present)
    #[arg(short, long, global = true, env = "SHELF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every e-book under a folder
    Import {
        /// Folder to scan (defaults to import.default_root)
        path: Option<PathBuf>,
        /// Record files where they are instead of copying them into the library
        #[arg(long)]
        no_copy: bool,
    },
    /// List catalogued books
    List {
        /// One of: last-read, last-added, unread, title, author
        #[arg(short, long, default_value_t = Selection::LastAdded)]
        order: Selection,
    },
    /// Show one book
    Show {
        /// Entry key (the book's file name)
        key: String,
    },
    /// Remove a book and its library copy
    Delete { key: String },
    /// Mark a book as read now
    MarkRead { key: String },
    /// Mark a book as unread
    MarkUnread { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf=info,shelf_importer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ShelfConfig::load(cli.config.as_deref())?;
    let catalog = Arc::new(open_catalog(&config).await?);

    match cli.command {
        Commands::Import { path, no_copy } => {
            let root = path.unwrap_or_else(|| config.import.default_root.clone());
            import(&config, catalog, root, no_copy).await?;
        }
        Commands::List { order } => {
            list(catalog, order).await?;
        }
        Commands::Show { key } => {
            let entry = catalog
                .get(&EntryKey::new(key.as_str()))
                .await?
                .with_context(|| format!("no book with key '{}'", key))?;
            show(&entry);
        }
        Commands::Delete { key } => {
            catalog.delete(&EntryKey::new(key.as_str())).await?;
            println!("Deleted {}", key);
        }
        Commands::MarkRead { key } => {
            catalog
                .mark_read(&EntryKey::new(key.as_str()), chrono::Utc::now())
                .await?;
            println!("Marked {} as read", key);
        }
        Commands::MarkUnread { key } => {
            catalog.mark_unread(&EntryKey::new(key.as_str())).await?;
            println!("Marked {} as unread", key);
        }
    }

    Ok(())
}

async fn open_catalog(config: &ShelfConfig) -> anyhow::Result<SqliteCatalog> {
    let pool = shelf_storage::open(&config.library.database_url)
        .await
        .with_context(|| format!("failed to open {}", config.library.database_url))?;
    tracing::debug!("Database connected");

    Ok(SqliteCatalog::new(
        pool,
        config.library.managed_storage_path.clone(),
    ))
}

async fn import(
    config: &ShelfConfig,
    catalog: Arc<SqliteCatalog>,
    root: PathBuf,
    no_copy: bool,
) -> anyhow::Result<()> {
    let extractor = EpubMetadataExtractor::new()
        .with_max_cover_bytes(config.import.max_cover_bytes)
        .fail_on_oversized_cover(config.import.fail_on_oversized_cover);

    let mut pipeline = ImportPipeline::from_config(
        catalog.clone(),
        Arc::new(extractor),
        catalog.managed().root(),
        &config.import,
    );
    if no_copy {
        pipeline = pipeline.copy_to_library(false);
    }

    let manager = ImportManager::new(pipeline, CatalogQuery::new(catalog));
    let mut handle = manager.start_import(root.clone())?;
    let mut renderer = ProgressRenderer::new();

    tracing::info!("Importing from {}", root.display());

    let mut interrupted = false;
    loop {
        tokio::select! {
            event = handle.progress.recv() => match event {
                Some(event) => renderer.handle(&event),
                None => break,
            },
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                tracing::warn!("Interrupted, stopping after the current file");
                handle.cancel();
                interrupted = true;
            }
        }
    }

    let outcome = handle.wait().await?;

    for line in outcome_messages(&outcome) {
        println!("{}", line);
    }
    for failure in &outcome.errors {
        eprintln!("  {}: {}", failure.path.display(), failure.message);
    }
    if outcome.needs_error_notice() {
        anyhow::bail!("import finished with errors");
    }

    Ok(())
}

async fn list(catalog: Arc<SqliteCatalog>, order: Selection) -> anyhow::Result<()> {
    let result = CatalogQuery::new(catalog).load(order).await?;

    if result.is_empty() {
        println!("No books in library");
        return Ok(());
    }

    println!("{} books ({}):", result.total, order);
    for entry in result.iter() {
        let marker = if entry.is_unread() { "*" } else { " " };
        println!(
            "{} {:<32} {:<40} {}",
            marker,
            entry.key.as_str(),
            entry.title,
            entry.author.display_name()
        );
    }

    Ok(())
}

fn show(entry: &CatalogEntry) {
    println!("Key:       {}", entry.key.as_str());
    println!("Title:     {}", entry.title);
    println!("Author:    {}", entry.author.display_name());
    println!("File:      {}", entry.file_path.display());
    println!("Added:     {}", entry.added_at.to_rfc3339());
    match entry.last_read {
        Some(at) => println!("Last read: {}", at.to_rfc3339()),
        None => println!("Last read: never"),
    }
    println!("State:     {}", entry.read_state.as_str());
    match &entry.cover {
        Some(cover) => println!("Cover:     {} bytes", cover.len()),
        None => println!("Cover:     none"),
    }
}
