//! parchment CLI - drive the blog service from the command line
//!
//! Wires the file-backed document and blob backends into the reconciled blog
//! service so blogs survive across invocations. Each subcommand is one
//! service operation; output is JSON by default for scripting.

use clap::{Parser, Subcommand};
use parchment::{
    Blog, BlogKey, BlogService, BlobContentStore, ContentStore, DocumentMetadataStore, FileBlobs,
    FileDocuments, Reconciler,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "parchment")]
#[command(about = "Dual-store blog persistence over local document and object stores")]
#[command(version)]
struct Cli {
    /// Directory holding the metadata file and content objects
    #[arg(short, long, default_value = ".parchment")]
    data_dir: PathBuf,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Log level for diagnostics on stderr
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a blog, merged from both stores
    Get {
        /// Author identifier
        author: String,
        /// Blog identifier
        blog: String,
    },

    /// Create or fully replace a blog
    Write {
        /// Author identifier
        author: String,
        /// Blog identifier
        blog: String,
        /// Blog title
        #[arg(short, long)]
        title: String,
        /// Body content (inline)
        content: Option<String>,
        /// Read body content from a file instead
        #[arg(short = 'F', long, conflicts_with = "content")]
        file: Option<PathBuf>,
        /// Mark the blog published on write
        #[arg(short, long)]
        published: bool,
    },

    /// Replace only the body content
    Revise {
        /// Author identifier
        author: String,
        /// Blog identifier
        blog: String,
        /// The new body content
        content: String,
    },

    /// Mark a blog published in both stores
    Publish {
        /// Author identifier
        author: String,
        /// Blog identifier
        blog: String,
    },

    /// Mark a blog unpublished in both stores
    Redact {
        /// Author identifier
        author: String,
        /// Blog identifier
        blog: String,
    },

    /// Remove a blog's content object
    Delete {
        /// Author identifier
        author: String,
        /// Blog identifier
        blog: String,
    },
}

type FileService = Reconciler<DocumentMetadataStore<FileDocuments>, BlobContentStore<FileBlobs>>;

fn open_service(data_dir: &Path) -> anyhow::Result<FileService> {
    let documents = FileDocuments::open_or_create(data_dir.join("blogs.json"))?;
    let blobs = FileBlobs::open_or_create(data_dir.join("content"))?;
    Ok(Reconciler::new(
        DocumentMetadataStore::new(documents),
        BlobContentStore::new(blobs),
    ))
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    match format {
        OutputFormat::Json => println!("{}", value),
        OutputFormat::Text => match value.as_object() {
            Some(map) => {
                for (key, val) in map {
                    println!("{}: {}", key, val);
                }
            }
            None => println!("{}", value),
        },
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _logger = flexi_logger::Logger::try_with_env_or_str(&cli.log_level)?.start()?;

    match cli.command {
        Commands::Get { author, blog } => {
            let service = open_service(&cli.data_dir)?;
            match service.get(&author, &blog) {
                Ok(found) => {
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "status": "ok",
                            "blog": found
                        }),
                    );
                }
                Err(err) if err.is_not_found() => {
                    output(
                        &cli.format,
                        &serde_json::json!({
                            "status": "error",
                            "message": format!("Blog not found: {}/{}", author, blog)
                        }),
                    );
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Commands::Write {
            author,
            blog,
            title,
            content,
            file,
            published,
        } => {
            let body = match (content, file) {
                (Some(inline), _) => inline,
                (None, Some(path)) => std::fs::read_to_string(&path)?,
                (None, None) => anyhow::bail!("provide body content inline or via --file"),
            };

            let service = open_service(&cli.data_dir)?;
            let entity =
                Blog::new(author.as_str(), blog.as_str(), title, body).with_published(published);
            service.write(&entity)?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "id": blog,
                    "authorId": author
                }),
            );
        }

        Commands::Revise {
            author,
            blog,
            content,
        } => {
            let service = open_service(&cli.data_dir)?;
            service.revise(&author, &blog, &content)?;
            output(&cli.format, &serde_json::json!({ "status": "ok" }));
        }

        Commands::Publish { author, blog } => {
            let service = open_service(&cli.data_dir)?;
            service.publish(&author, &blog)?;
            output(&cli.format, &serde_json::json!({ "status": "ok" }));
        }

        Commands::Redact { author, blog } => {
            let service = open_service(&cli.data_dir)?;
            service.redact(&author, &blog)?;
            output(&cli.format, &serde_json::json!({ "status": "ok" }));
        }

        Commands::Delete { author, blog } => {
            // Object removal is a content-store capability, not a service
            // operation; reach the adapter directly.
            let blobs = FileBlobs::open_or_create(cli.data_dir.join("content"))?;
            let content = BlobContentStore::new(blobs);
            content.delete(&BlogKey::new(author, blog)?)?;
            output(&cli.format, &serde_json::json!({ "status": "ok" }));
        }
    }

    Ok(())
}
