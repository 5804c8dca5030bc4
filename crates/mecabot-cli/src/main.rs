//! MecaBot - repair triage from the command line
//!
//! The `mecabot` command classifies a car repair problem description into a
//! repair category and an estimated duration.
//!
//! ## Commands
//!
//! - `classify`: Classify a problem description
//! - `prompt`: Show the prompt that would be sent to the model
//! - `categories`: Administer the category store used as fallback
//! - `catalog`: Show the categories the model is taught

use std::sync::Arc;

use anyhow::{Context, Result};
use category_store::{CategoryStore, OfflineCategoryStore, StoreResult, SurrealCategoryStore};
use clap::{Parser, Subcommand, ValueEnum};
use llm_gateway::{ClassifierGateway, OpenAiGateway};
use mecabot_core::{
    CategoryCatalog, CategoryCode, ClassificationResolver, ProblemDescription, PromptTemplate,
    StoreFaultPolicy, METRICS,
};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "mecabot")]
#[command(author = "MecaBot Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Classify car repair requests into categories and durations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a problem description
    Classify {
        /// Free-text problem description (10 to 2000 characters)
        description: String,

        /// Also report which stage produced the answer
        #[arg(long)]
        explain: bool,

        /// What to do when the category store fails during fallback
        #[arg(
            long,
            value_enum,
            env = "MECABOT_STORE_FAULT",
            default_value_t = StoreFaultArg::TreatAsNotFound
        )]
        store_fault: StoreFaultArg,
    },

    /// Print the prompt for a description without calling the model
    Prompt {
        /// Free-text problem description
        description: String,
    },

    /// Manage the category store
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },

    /// Show the compiled-in category catalog
    Catalog,
}

#[derive(Subcommand)]
enum CategoriesAction {
    /// List stored categories
    List,
    /// Add a category
    Add {
        /// Display name, unique ignoring case
        name: String,
        /// Average repair time in minutes
        minutes: u32,
    },
    /// Remove a category by name (case-insensitive)
    Remove {
        /// Display name
        name: String,
    },
    /// Insert one category per catalog entry, skipping existing names
    Seed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreFaultArg {
    TreatAsNotFound,
    Propagate,
}

impl From<StoreFaultArg> for StoreFaultPolicy {
    fn from(arg: StoreFaultArg) -> Self {
        match arg {
            StoreFaultArg::TreatAsNotFound => StoreFaultPolicy::TreatAsNotFound,
            StoreFaultArg::Propagate => StoreFaultPolicy::Propagate,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    mecabot_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Classify {
            description,
            explain,
            store_fault,
        } => cmd_classify(&description, explain, store_fault.into()).await,
        Commands::Prompt { description } => {
            println!("{}", render_prompt(&CategoryCatalog::builtin(), &description));
            Ok(())
        }
        Commands::Categories { action } => {
            let store = connect_store().await?;
            match action {
                CategoriesAction::List => cmd_categories_list(&store).await,
                CategoriesAction::Add { name, minutes } => {
                    cmd_categories_add(&store, &name, minutes).await
                }
                CategoriesAction::Remove { name } => cmd_categories_remove(&store, &name).await,
                CategoriesAction::Seed => {
                    cmd_categories_seed(&store, &CategoryCatalog::builtin()).await
                }
            }
        }
        Commands::Catalog => {
            print!("{}", render_catalog(&CategoryCatalog::builtin()));
            Ok(())
        }
    };

    METRICS.flush();
    result
}

async fn connect_store() -> Result<SurrealCategoryStore> {
    SurrealCategoryStore::setup_from_env()
        .await
        .context("Failed to connect to category store")
}

/// Classify a description against the configured model and store
async fn cmd_classify(description: &str, explain: bool, policy: StoreFaultPolicy) -> Result<()> {
    let description = ProblemDescription::parse(description)?;

    let gateway = OpenAiGateway::from_env().context("Failed to configure LLM gateway")?;
    let store = store_for_classify(SurrealCategoryStore::setup_from_env().await, policy)?;
    let resolver = ClassificationResolver::new(Arc::new(gateway), store, CategoryCatalog::builtin())
        .with_store_fault_policy(policy);

    let output = classify_to_json(&resolver, description.as_str(), explain).await?;
    println!("{}", output);

    Ok(())
}

/// Pick the fallback store for `classify`.
///
/// An unreachable store only matters when the model gives no answer, so under
/// `TreatAsNotFound` the connect error is deferred to the fallback lookup.
fn store_for_classify(
    connected: StoreResult<SurrealCategoryStore>,
    policy: StoreFaultPolicy,
) -> Result<Arc<dyn CategoryStore>> {
    match connected {
        Ok(store) => Ok(Arc::new(store)),
        Err(err) => match policy {
            StoreFaultPolicy::TreatAsNotFound => {
                warn!(error = %err, "Category store unreachable, fallback lookups will fail");
                Ok(Arc::new(OfflineCategoryStore::from_error(&err)))
            }
            StoreFaultPolicy::Propagate => {
                Err(anyhow::Error::new(err).context("Failed to connect to category store"))
            }
        },
    }
}

async fn classify_to_json<G, S>(
    resolver: &ClassificationResolver<G, S>,
    description: &str,
    explain: bool,
) -> Result<String>
where
    G: ClassifierGateway + ?Sized,
    S: CategoryStore + ?Sized,
{
    let resolution = resolver
        .resolve(description)
        .await
        .context("Classification failed")?;

    let json = if explain {
        serde_json::to_string(&resolution)?
    } else {
        serde_json::to_string(&resolution.result)?
    };
    Ok(json)
}

fn render_prompt(catalog: &CategoryCatalog, description: &str) -> String {
    PromptTemplate::new(catalog).render(description)
}

fn render_catalog(catalog: &CategoryCatalog) -> String {
    let width = catalog
        .entries()
        .iter()
        .map(|e| e.code.as_str().chars().count())
        .max()
        .unwrap_or(0);
    catalog
        .entries()
        .iter()
        .map(|e| format!("{:<width$}  {:>4} min\n", e.code.as_str(), e.minutes))
        .collect()
}

/// List stored categories
async fn cmd_categories_list(store: &dyn CategoryStore) -> Result<()> {
    let categories = store.list().await.context("Failed to list categories")?;

    if categories.is_empty() {
        println!("No categories stored. Run 'mecabot categories seed' first.");
        return Ok(());
    }

    for category in categories {
        println!(
            "{:<30} {:>4} min  -> {}",
            category.name,
            category.avg_minutes,
            CategoryCode::from_display_name(&category.name)
        );
    }

    Ok(())
}

/// Add a category
async fn cmd_categories_add(store: &dyn CategoryStore, name: &str, minutes: u32) -> Result<()> {
    let record = store
        .save(name, minutes)
        .await
        .context(format!("Failed to add category '{}'", name))?;

    println!("Added '{}' ({} min)", record.name, record.avg_minutes);

    Ok(())
}

/// Remove a category
async fn cmd_categories_remove(store: &dyn CategoryStore, name: &str) -> Result<()> {
    let removed = store
        .remove(name)
        .await
        .context(format!("Failed to remove category '{}'", name))?;

    if removed {
        println!("Removed '{}'", name);
    } else {
        println!("No category named '{}'", name);
    }

    Ok(())
}

/// Seed the store from the catalog, returning how many rows were inserted
async fn seed_from_catalog(store: &dyn CategoryStore, catalog: &CategoryCatalog) -> Result<usize> {
    let mut inserted = 0;
    for entry in catalog.entries() {
        let name = entry.code.to_display_name();
        if store.find_by_name_case_insensitive(&name).await?.is_some() {
            info!(name = %name, "category already present, skipping");
            continue;
        }
        store
            .save(&name, entry.minutes)
            .await
            .context(format!("Failed to seed category '{}'", name))?;
        inserted += 1;
    }
    Ok(inserted)
}

async fn cmd_categories_seed(store: &dyn CategoryStore, catalog: &CategoryCatalog) -> Result<()> {
    let inserted = seed_from_catalog(store, catalog).await?;
    println!(
        "Seeded {} of {} catalog categories",
        inserted,
        catalog.len()
    );
    Ok(())
}
