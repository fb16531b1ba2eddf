//! Back-office command line for the clinic data layer.
//!
//! # Responsibility
//! - Expose price-list and page-content operations to operators.
//! - Gate mutating commands behind the admin sign-in flag.
//! - Print results as pretty JSON on stdout.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use clinicdata_core::catalog::{group_by_category, search_rates};
use clinicdata_core::{
    default_log_level, init_logging, AdminGate, AppConfig, DataConfig, DataFacade, KeyValueStore,
    MemoryKeyValueStore, NewRate, RatePatch, SectionContent, SqliteKeyValueStore,
};
use log::info;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

const LOG_LEVEL_VAR: &str = "CLINIC_LOG_LEVEL";
const LOG_DIR_VAR: &str = "CLINIC_LOG_DIR";

/// clinicdata - price list and site content administration
#[derive(Parser, Debug)]
#[command(name = "clinicdata")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); falls back to CLINIC_LOG_LEVEL
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute log directory; falls back to CLINIC_LOG_DIR
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price-list entries
    #[command(subcommand)]
    Rates(RatesCommand),

    /// Page-content blocks
    #[command(subcommand)]
    Content(ContentCommand),

    /// Local admin sign-in
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
enum RatesCommand {
    /// List entries (all, or only active ones)
    #[command(alias = "ls")]
    List {
        /// Only entries visible on the public site
        #[arg(long)]
        active: bool,

        /// Case-insensitive match on name, category or description
        #[arg(long)]
        search: Option<String>,

        /// Group the output by category
        #[arg(long)]
        grouped: bool,
    },

    /// Add an entry
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: f64,

        #[arg(long)]
        category: String,

        #[arg(long)]
        description: Option<String>,

        /// Hide the entry from the public site
        #[arg(long)]
        inactive: bool,
    },

    /// Change selected fields of an entry
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,

        #[arg(long)]
        clear_description: bool,

        /// true or false
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete an entry
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ContentCommand {
    /// List every block
    #[command(alias = "ls")]
    List,

    /// Add a block for a page section
    Add {
        section: String,

        #[command(flatten)]
        fields: SectionArgs,
    },

    /// Replace the section and payload of a block
    Update {
        id: String,

        section: String,

        #[command(flatten)]
        fields: SectionArgs,
    },

    /// Delete a block
    Delete { id: String },
}

#[derive(Args, Debug)]
struct SectionArgs {
    #[arg(long)]
    title: Option<String>,

    /// Body text
    #[arg(long)]
    body: Option<String>,

    #[arg(long)]
    image_url: Option<String>,

    #[arg(long)]
    button_text: Option<String>,

    #[arg(long)]
    button_link: Option<String>,
}

impl From<SectionArgs> for SectionContent {
    fn from(args: SectionArgs) -> Self {
        Self {
            title: args.title,
            content: args.body,
            image_url: args.image_url,
            button_text: args.button_text,
            button_link: args.button_link,
        }
    }
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Sign in with the shared admin secret
    Login {
        #[arg(long)]
        secret: String,
    },

    /// Clear the admin flag
    Logout,

    /// Show whether admin commands are allowed
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    start_logging(&cli);

    let config = AppConfig::from_env().context("invalid configuration")?;
    let gate = AdminGate::new(config.admin.clone(), admin_store(&config.data)?);
    let facade = DataFacade::new(config.data);

    match cli.command {
        Commands::Rates(command) => run_rates(&facade, &gate, command).await,
        Commands::Content(command) => run_content(&facade, &gate, command).await,
        Commands::Admin(command) => run_admin(&gate, command),
    }
}

async fn run_rates(facade: &DataFacade, gate: &AdminGate, command: RatesCommand) -> Result<()> {
    match command {
        RatesCommand::List {
            active,
            search,
            grouped,
        } => {
            let rates = if active {
                facade.fetch_active_rates().await?
            } else {
                facade.list_rates().await?
            };
            let matched = search_rates(&rates, search.as_deref().unwrap_or_default());
            if grouped {
                let groups: Vec<Value> = group_by_category(matched)
                    .into_iter()
                    .map(|group| json!({ "category": group.label, "rates": group.rates }))
                    .collect();
                print_json(Value::Array(groups))
            } else {
                print_json(serde_json::to_value(matched)?)
            }
        }
        RatesCommand::Add {
            name,
            price,
            category,
            description,
            inactive,
        } => {
            require_admin(gate)?;
            let payload = NewRate {
                test_name: name,
                price,
                category,
                description,
                is_active: !inactive,
            };
            facade.add_rate(payload).await?;
            info!("event=cli_command module=cli status=ok command=rates_add");
            Ok(())
        }
        RatesCommand::Update {
            id,
            name,
            price,
            category,
            description,
            clear_description,
            active,
        } => {
            require_admin(gate)?;
            let patch = RatePatch {
                test_name: name,
                price,
                category,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                is_active: active,
            };
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            facade.update_rate(&id, patch).await?;
            info!("event=cli_command module=cli status=ok command=rates_update");
            Ok(())
        }
        RatesCommand::Delete { id } => {
            require_admin(gate)?;
            facade.delete_rate(&id).await?;
            info!("event=cli_command module=cli status=ok command=rates_delete");
            Ok(())
        }
    }
}

async fn run_content(
    facade: &DataFacade,
    gate: &AdminGate,
    command: ContentCommand,
) -> Result<()> {
    match command {
        ContentCommand::List => print_json(serde_json::to_value(facade.list_content().await?)?),
        ContentCommand::Add { section, fields } => {
            require_admin(gate)?;
            facade.add_content(section, fields.into()).await?;
            info!("event=cli_command module=cli status=ok command=content_add");
            Ok(())
        }
        ContentCommand::Update {
            id,
            section,
            fields,
        } => {
            require_admin(gate)?;
            facade.update_content(&id, section, fields.into()).await?;
            info!("event=cli_command module=cli status=ok command=content_update");
            Ok(())
        }
        ContentCommand::Delete { id } => {
            require_admin(gate)?;
            facade.delete_content(&id).await?;
            info!("event=cli_command module=cli status=ok command=content_delete");
            Ok(())
        }
    }
}

fn run_admin(gate: &AdminGate, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Login { secret } => {
            gate.sign_in(&secret)?;
            println!("signed in");
        }
        AdminCommand::Logout => {
            gate.sign_out()?;
            println!("signed out");
        }
        AdminCommand::Status => print_json(json!({ "admin": gate.is_admin()? }))?,
    }
    Ok(())
}

fn require_admin(gate: &AdminGate) -> Result<()> {
    if !gate.is_admin()? {
        bail!("admin sign-in required; run `clinicdata admin login --secret <SECRET>` first");
    }
    Ok(())
}

/// The admin flag lives next to the data slots when a database file is set.
fn admin_store(data: &DataConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match &data.local_db_path {
        Some(path) => Arc::new(
            SqliteKeyValueStore::open(path)
                .with_context(|| format!("failed to open `{}`", path.display()))?,
        ),
        None => Arc::new(MemoryKeyValueStore::new()),
    };
    Ok(store)
}

/// Logging is best effort; the command still runs if the logger cannot start.
fn start_logging(cli: &Cli) {
    let level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var(LOG_LEVEL_VAR).ok())
        .unwrap_or_else(|| default_log_level().to_string());
    let dir = cli
        .log_dir
        .clone()
        .or_else(|| std::env::var_os(LOG_DIR_VAR).map(PathBuf::from))
        .unwrap_or_else(|| std::env::temp_dir().join("clinicdata-logs"));

    if let Err(err) = init_logging(&level, &dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn print_json(value: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
