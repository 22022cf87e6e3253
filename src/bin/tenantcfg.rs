//! tenantcfg CLI - inspect and validate entity and pricing configuration
//!
//! Loads the entity and pricing YAML files, runs startup validation and
//! prints the derived artifacts (storage schema, field projections,
//! validation rules, plan table, quota decisions).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use tenantcfg::entity::{self, EntitySchemaRegistry};
use tenantcfg::plan::{self, PlanRegistry};
use tenantcfg::{builtin, Settings};
use tracing_subscriber::EnvFilter;

/// Exit code for a denied quota check
const EXIT_DENIED: i32 = 2;

#[derive(Parser)]
#[command(name = "tenantcfg")]
#[command(version, about = "Entity schema and plan configuration tool", long_about = None)]
struct Cli {
    /// Entity YAML file (default: $TENANTCFG_ENTITY_CONFIG or config/entity.yaml)
    #[arg(long, global = true)]
    entity: Option<PathBuf>,

    /// Pricing YAML file (default: $TENANTCFG_PRICING_CONFIG or config/pricing.yaml)
    #[arg(long, global = true)]
    pricing: Option<PathBuf>,

    /// Use the configuration bundled into the binary
    #[arg(long, global = true, conflicts_with_all = ["entity", "pricing"])]
    builtin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load both configurations and run startup validation
    Validate,

    /// Print CREATE TABLE DDL for the entity
    Schema {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a field projection with storage types and validation rules
    Fields {
        #[arg(short, long, value_enum, default_value = "list")]
        view: View,
    },

    /// Print validation rules for form fields
    Rules,

    /// Print the plan table
    Plans,

    /// Decide whether one more unit of a limit is allowed (exit 0 allowed, 2 denied)
    Check {
        /// Tier id; omit for anonymous usage
        #[arg(short, long)]
        tier: Option<String>,

        /// Limit key (e.g. dashboards)
        #[arg(short, long)]
        key: String,

        /// Current usage count
        #[arg(short, long)]
        usage: u64,
    },

    /// Resolve a billing identifier to its tier
    Billing {
        #[arg(long)]
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    List,
    Form,
}

fn main() {
    let settings = Settings::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Validate => validate_config(&cli, &settings),
        Commands::Schema { output } => print_schema(&cli, &settings, output.as_ref()),
        Commands::Fields { view } => print_fields(&cli, &settings, *view),
        Commands::Rules => print_rules(&cli, &settings),
        Commands::Plans => print_plans(&cli, &settings),
        Commands::Check { tier, key, usage } => check_limit(&cli, &settings, tier.as_deref(), key, *usage),
        Commands::Billing { id } => resolve_billing(&cli, &settings, id),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn entity_registry(cli: &Cli, settings: &Settings) -> Result<EntitySchemaRegistry, String> {
    let registry = if cli.builtin {
        builtin::entity_registry()
    } else {
        let path = cli.entity.as_ref().unwrap_or(&settings.entity_config);
        entity::load_entity(path)
    };
    registry.map_err(|e| format!("Failed to load entity: {}", e))
}

fn plan_registry(cli: &Cli, settings: &Settings) -> Result<PlanRegistry, String> {
    let registry = if cli.builtin {
        builtin::plan_registry()
    } else {
        let path = cli.pricing.as_ref().unwrap_or(&settings.pricing_config);
        plan::load_pricing(path)
    };
    registry.map_err(|e| format!("Failed to load pricing: {}", e))
}

/// Validate both configurations
fn validate_config(cli: &Cli, settings: &Settings) -> Result<(), String> {
    println!("🔍 Validating configuration...");

    let entities = entity_registry(cli, settings)?;
    println!(
        "  ✓ Entity '{}' ({} fields)",
        entities.entity().name,
        entities.entity().fields.len()
    );

    let plans = plan_registry(cli, settings)?;
    println!("  ✓ {} plans", plans.plans().len());

    for plan in plans.paid_plans() {
        if plan.price_id.is_none() {
            println!("  ℹ Plan '{}' has no monthly billing id", plan.id);
        }
    }

    println!("✅ Configuration is valid!");
    Ok(())
}

fn print_schema(cli: &Cli, settings: &Settings, output: Option<&PathBuf>) -> Result<(), String> {
    let registry = entity_registry(cli, settings)?;

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
            entity::write_schema(&registry, &mut file)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            println!("  ✓ Generated {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            entity::write_schema(&registry, &mut stdout)
                .map_err(|e| format!("Failed to write schema: {}", e))?;
        }
    }

    Ok(())
}

fn print_fields(cli: &Cli, settings: &Settings, view: View) -> Result<(), String> {
    let registry = entity_registry(cli, settings)?;
    let fields = match view {
        View::List => registry.list_fields(),
        View::Form => registry.form_fields(),
    };

    for field in fields {
        println!(
            "{:<24} {:<14} {:<24} {}",
            field.name,
            field.field_type,
            registry.field_type_to_storage_type(field.field_type),
            registry.field_type_to_validation_rule(field)
        );
    }

    Ok(())
}

fn print_rules(cli: &Cli, settings: &Settings) -> Result<(), String> {
    let registry = entity_registry(cli, settings)?;

    for (name, rule) in registry.form_rules() {
        println!("{}: {}", name, rule);
    }

    Ok(())
}

fn print_plans(cli: &Cli, settings: &Settings) -> Result<(), String> {
    let registry = plan_registry(cli, settings)?;

    for plan in registry.plans() {
        let marker = if plan.highlighted { "*" } else { " " };
        let limits: Vec<String> = registry
            .limits(Some(plan.id.as_str()))
            .iter()
            .map(|(key, quota)| format!("{}={}", key, quota))
            .collect();

        println!(
            "{} {:<12} {:>8.2}/mo  {}",
            marker,
            plan.id,
            plan.price.monthly,
            limits.join(", ")
        );
    }

    Ok(())
}

fn check_limit(
    cli: &Cli,
    settings: &Settings,
    tier: Option<&str>,
    key: &str,
    usage: u64,
) -> Result<(), String> {
    let registry = plan_registry(cli, settings)?;

    if registry.check_limit(tier, key, usage) {
        println!("allowed");
        Ok(())
    } else {
        println!("denied");
        process::exit(EXIT_DENIED);
    }
}

fn resolve_billing(cli: &Cli, settings: &Settings, billing_id: &str) -> Result<(), String> {
    let registry = plan_registry(cli, settings)?;

    match registry.plan_by_billing_id(billing_id) {
        Some(tier) => {
            println!("{}", tier);
            Ok(())
        }
        None => Err(format!("No plan is bound to billing id '{}'", billing_id)),
    }
}
