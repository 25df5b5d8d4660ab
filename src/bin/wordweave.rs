//! wordweave CLI — ingest text into a word adjacency graph.
//!
//! Usage:
//!   wordweave ingest <doc_name> [FILE] [--db path] [--json]
//!   wordweave segment [FILE]
//!   wordweave identify <WORD>...
//!   wordweave collisions <PATH>
//!   wordweave links <doc_name> [--db path]
//!   wordweave docs [--db path]

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;
use wordweave::{
    identify, sentencize, tokenize, CollisionReport, Config, HashScheme, Ingestor, OpenStore,
    Sentence, SqliteStore, StorageResult, WordId, WordStore,
};

#[derive(Parser)]
#[command(name = "wordweave", version, about = "Word adjacency graph ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Path to YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a text file (or stdin) as a named document
    Ingest {
        /// Document name; re-ingesting the same name adds to its counts
        doc_name: String,
        /// Text file to read; stdin when omitted
        file: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print sentences and their tokens
    Segment {
        /// Text file to read; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Print the identifier of each word
    Identify {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Report identifier collisions over the words of .txt files
    Collisions {
        /// File or directory to scan
        path: PathBuf,
    },
    /// Print the stored links of a document
    Links {
        doc_name: String,
    },
    /// List stored documents
    Docs,
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env("WORDWEAVE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(file: Option<&Path>) -> std::io::Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn open_store(config: &Config, db: Option<PathBuf>) -> Result<SqliteStore, String> {
    let db_path = config.resolve_db_path(db);
    SqliteStore::open(&db_path, HashScheme::default())
        .map_err(|e| format!("Failed to open database at {}: {}", db_path.display(), e))
}

fn cmd_ingest(store: SqliteStore, doc_name: &str, file: Option<&Path>, json: bool) -> i32 {
    let bytes = match read_input(file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: cannot read input: {}", e);
            return 1;
        }
    };
    let ingestor = Ingestor::new(Arc::new(store));
    let report = match ingestor.ingest_bytes(doc_name, &bytes) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
        return 0;
    }

    match report.doc_id {
        Some(id) => println!(
            "Ingested '{}' ({}): {} sentences, {} words ({} new), {} links, +{} incidence",
            report.doc_name,
            id,
            report.sentences,
            report.distinct_words,
            report.words_inserted,
            report.distinct_links,
            report.incidence
        ),
        None => println!("Nothing to ingest for '{}': no tokens", report.doc_name),
    }
    0
}

fn cmd_segment(file: Option<&Path>) -> i32 {
    let bytes = match read_input(file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: cannot read input: {}", e);
            return 1;
        }
    };
    let text = match std::str::from_utf8(&bytes) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: input is not valid UTF-8: {}", e);
            return 1;
        }
    };
    for (i, sentence) in sentencize(text).iter().enumerate() {
        let parsed = Sentence::from_text(sentence);
        let tagged: Vec<String> = parsed
            .records()
            .map(|r| format!("{}/{}", r.word, r.link_type))
            .collect();
        println!("{:>4}  {}", i, sentence);
        println!("      {}", tagged.join(" "));
    }
    0
}

fn cmd_identify(words: &[String]) -> i32 {
    for word in words {
        println!("{:>20}  {}", identify(word), word);
    }
    0
}

/// Case-folded words of every .txt file under `path`
fn corpus_words(path: &Path) -> std::io::Result<Vec<String>> {
    let mut words = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable path");
                continue;
            }
        };
        let file = entry.path();
        let is_txt = file.extension().and_then(|e| e.to_str()) == Some("txt");
        if !entry.file_type().is_file() || !is_txt {
            continue;
        }
        let text = std::fs::read_to_string(file)?;
        for sentence in sentencize(&text) {
            words.extend(tokenize(&sentence).into_iter().map(str::to_lowercase));
        }
    }
    Ok(words)
}

fn cmd_collisions(path: &Path) -> i32 {
    let words = match corpus_words(path) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", path.display(), e);
            return 1;
        }
    };
    let total = words.len();
    let report = CollisionReport::from_words(HashScheme::default(), words);

    println!("scheme          {}", report.scheme);
    println!("total words     {}", total);
    println!("unique words    {}", report.distinct_words);
    println!("collisions      {} ({:.6}%)", report.collisions.len(), report.collision_percent());
    for group in &report.collisions {
        println!("  {}", group.join(", "));
    }
    0
}

fn cmd_links(store: &dyn WordStore, doc_name: &str) -> i32 {
    let doc_id = match store.find_doc(doc_name) {
        Ok(Some(id)) => id,
        Ok(None) => {
            eprintln!("Error: document '{}' not found", doc_name);
            return 1;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let links = match store.load_links(doc_id) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut names: HashMap<WordId, String> = HashMap::new();
    for link in links {
        let pair = word_name(store, &mut names, link.a_word_id)
            .and_then(|a| Ok((a, word_name(store, &mut names, link.b_word_id)?)));
        let (a, b) = match pair {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        println!("{:<20} {:<20} {:<5} {:>6}", a, b, link.link_type, link.incidence);
    }
    0
}

/// Stored spelling of a word id, `#<id>` when the word row is missing
fn word_name(
    store: &dyn WordStore,
    names: &mut HashMap<WordId, String>,
    id: WordId,
) -> StorageResult<String> {
    if let Some(name) = names.get(&id) {
        return Ok(name.clone());
    }
    let name = match store.find_word(id)? {
        Some(word) => word.word,
        None => format!("#{}", id),
    };
    names.insert(id, name.clone());
    Ok(name)
}

fn cmd_docs(store: &dyn WordStore) -> i32 {
    let docs = match store.list_docs() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if docs.is_empty() {
        println!("No documents stored.");
        return 0;
    }
    println!("{:>6}  {:<32}  {}", "ID", "NAME", "CREATED");
    println!("{}", "-".repeat(72));
    for doc in docs {
        println!("{:>6}  {:<32}  {}", doc.id, doc.doc_name, doc.created_at.to_rfc3339());
    }
    0
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: cannot load config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    init_tracing(&config.log_level);

    let code = match cli.command {
        Commands::Segment { file } => cmd_segment(file.as_deref()),
        Commands::Identify { words } => cmd_identify(&words),
        Commands::Collisions { path } => cmd_collisions(&path),
        Commands::Ingest { doc_name, file, json } => match open_store(&config, cli.db) {
            Ok(store) => cmd_ingest(store, &doc_name, file.as_deref(), json),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Links { doc_name } => match open_store(&config, cli.db) {
            Ok(store) => cmd_links(&store, &doc_name),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Docs => match open_store(&config, cli.db) {
            Ok(store) => cmd_docs(&store),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
    };
    std::process::exit(code);
}
