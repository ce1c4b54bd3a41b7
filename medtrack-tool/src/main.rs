mod commands;
mod config;
mod context;
mod error;
mod session;
mod store;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use medtrack_core::{Credentials, Registration};
use tracing_subscriber::EnvFilter;

use crate::commands::account::{self, LoginMethod};
use crate::commands::medicine;
use crate::config::resolve_store_config;
use crate::context::AppContext;
use crate::error::ToolError;
use crate::session::default_session_path;
use crate::store::StoreType;

#[derive(Parser)]
#[command(name = "medt")]
#[command(about = "Track medicines and their expiry dates", long_about = None)]
struct Cli {
    /// Store type: firestore or local
    #[arg(long, global = true)]
    store_type: Option<StoreType>,

    /// Path to the local store
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        repeat_password: String,
    },

    /// Log in with email/password or a Google id token
    Login {
        #[arg(long, conflicts_with = "google_id_token")]
        email: Option<String>,
        #[arg(long, conflicts_with = "google_id_token")]
        password: Option<String>,
        #[arg(long)]
        google_id_token: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Add a medicine by hand
    Add {
        #[arg(long)]
        name: String,
        /// Expiry date as YYYY-MM-DD
        #[arg(long)]
        expiry: String,
    },

    /// Decode a GS1 barcode payload and save the medicine
    Scan {
        /// Scanned text, e.g. "(01)12345678901234(17)260115"
        payload: String,
    },

    /// Decode a GS1 barcode payload without saving
    Decode { payload: String },

    /// List all stored medicines
    List,

    /// Medicines that are expired or expire within 31 days
    Reminders {
        /// Reference date as YYYY-MM-DD (default: today)
        #[arg(long)]
        today: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MEDTRACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_context(
    store_type: Option<StoreType>,
    store: Option<PathBuf>,
    session_path: &Path,
) -> Result<AppContext, ToolError> {
    let (store_type, store_path, local_user) = resolve_store_config(store_type, store);
    AppContext::open(store_type, store_path, local_user, session_path).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let session_path = default_session_path();
    let json = cli.json;

    match cli.command {
        Command::Register {
            first_name,
            last_name,
            username,
            email,
            password,
            repeat_password,
        } => {
            let form = Registration {
                first_name,
                last_name,
                username,
                email,
                password,
                repeat_password,
            };
            account::register(form, json).await?;
        }
        Command::Login {
            email,
            password,
            google_id_token,
        } => {
            let method = match google_id_token {
                Some(id_token) => LoginMethod::Google { id_token },
                None => LoginMethod::Password(Credentials {
                    email: email.unwrap_or_default(),
                    password: password.unwrap_or_default(),
                }),
            };
            account::login(method, &session_path, json).await?;
        }
        Command::Logout => account::logout(&session_path)?,
        Command::Whoami => account::whoami(&session_path, json)?,
        Command::Decode { payload } => medicine::decode_only(&payload, json)?,
        Command::Add { name, expiry } => {
            let ctx = open_context(cli.store_type, cli.store, &session_path).await?;
            medicine::add(&ctx, &name, &expiry, json).await?
        }
        Command::Scan { payload } => {
            let ctx = open_context(cli.store_type, cli.store, &session_path).await?;
            medicine::scan(&ctx, &payload, json).await?
        }
        Command::List => {
            let ctx = open_context(cli.store_type, cli.store, &session_path).await?;
            medicine::list(&ctx, json).await?
        }
        Command::Reminders { today } => {
            let ctx = open_context(cli.store_type, cli.store, &session_path).await?;
            medicine::reminders(&ctx, today.as_deref(), json).await?
        }
    }

    Ok(())
}
