use clap::{Parser, Subcommand};
use notepad_rest_api::api::{self, AppState, CreateFolderRequest, CreateNoteRequest, ListNotesParams};
use notepad_rest_api::client::{self, ClientError};
use notepad_rest_api::config::Config;
use notepad_rest_api::store::{self, DocumentStore, MemoryStore};
use notepad_rest_api::tables::NoteChanges;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// The address to bind to (defaults to 0.0.0.0:$PORT)
        #[arg(short, long)]
        addr: Option<SocketAddr>,
        /// Keep everything in memory instead of using the configured database
        #[arg(long)]
        memory: bool,
    },
    /// Client commands
    Client {
        /// The base URL of the API
        #[arg(long, default_value = notepad_rest_api::BASE_URL)]
        url: String,
        #[command(subcommand)]
        command: ClientCommands,
    },
}

#[derive(Subcommand)]
enum ClientCommands {
    /// Notes related commands
    Notes {
        #[command(subcommand)]
        command: NotesCommands,
    },
    /// Folders related commands
    Folders {
        #[command(subcommand)]
        command: FoldersCommands,
    },
    /// Show the server diagnostics
    Health,
}

#[derive(Subcommand)]
enum NotesCommands {
    /// List notes
    List {
        /// Only notes in this folder
        #[arg(long)]
        folder_id: Option<String>,
        /// Case-insensitive text to look for in title or content
        #[arg(long)]
        q: Option<String>,
    },
    /// Create a new note
    Create {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        folder_id: Option<String>,
        /// May be repeated
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        pinned: bool,
    },
    /// Update fields of an existing note
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        folder_id: Option<String>,
        /// Replaces all tags; may be repeated
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        pinned: Option<bool>,
    },
    /// Delete a note
    Delete { id: String },
}

#[derive(Subcommand)]
enum FoldersCommands {
    /// List folders
    List,
    /// Create a new folder
    Create {
        name: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete an empty folder
    Delete { id: String },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notepad_rest_api=info,cli=info,tower_http=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

async fn serve(addr: Option<SocketAddr>, memory: bool) -> anyhow::Result<()> {
    let config = Config::from_env();
    let addr = addr.unwrap_or_else(|| config.bind_addr());

    let store: Option<Arc<dyn DocumentStore>> = if memory {
        info!("Using in-memory store");
        Some(Arc::new(MemoryStore::new()))
    } else {
        store::connect(&config)
    };

    let app = api::create_router(AppState::new(store, config));

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_client(url: &str, command: ClientCommands) -> Result<(), ClientError> {
    match command {
        ClientCommands::Health => {
            let report = client::fetch_health(url).await?;
            print_pretty(&report);
        }
        ClientCommands::Notes { command } => match command {
            NotesCommands::List { folder_id, q } => {
                let notes = client::fetch_notes(url, &ListNotesParams { folder_id, q }).await?;
                print_pretty(&notes);
            }
            NotesCommands::Create {
                title,
                content,
                folder_id,
                tags,
                pinned,
            } => {
                let request = CreateNoteRequest {
                    title,
                    content,
                    folder_id,
                    tags: (!tags.is_empty()).then_some(tags),
                    pinned,
                };
                let id = client::create_note(url, &request).await?;
                print_pretty(&serde_json::json!({ "id": id }));
            }
            NotesCommands::Update {
                id,
                title,
                content,
                folder_id,
                tags,
                pinned,
            } => {
                let changes = NoteChanges {
                    title,
                    content,
                    folder_id: folder_id.map(Some),
                    tags: (!tags.is_empty()).then_some(tags),
                    pinned,
                    ..NoteChanges::default()
                };
                client::update_note(url, &id, &changes).await?;
                print_pretty(&serde_json::json!({ "success": true }));
            }
            NotesCommands::Delete { id } => {
                client::delete_note(url, &id).await?;
                print_pretty(&serde_json::json!({ "success": true }));
            }
        },
        ClientCommands::Folders { command } => match command {
            FoldersCommands::List => {
                let folders = client::fetch_folders(url).await?;
                print_pretty(&folders);
            }
            FoldersCommands::Create { name, color, icon } => {
                let id =
                    client::create_folder(url, &CreateFolderRequest { name, color, icon }).await?;
                print_pretty(&serde_json::json!({ "id": id }));
            }
            FoldersCommands::Delete { id } => {
                client::delete_folder(url, &id).await?;
                print_pretty(&serde_json::json!({ "success": true }));
            }
        },
    }
    Ok(())
}

fn print_pretty<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { addr, memory } => {
            init_tracing();
            serve(addr, memory).await
        }
        Commands::Client { url, command } => {
            if let Err(e) = run_client(&url, command).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
