mod browse;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use training_core::*;

#[derive(Parser)]
#[command(name = "fut7")]
#[command(about = "Fútbol 7 training plan browser for coaches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog service base URL (overrides FUT7_BACKEND_URL and the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Use the built-in catalog instead of the catalog service
    #[arg(long, global = true)]
    offline: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the plan and run sessions interactively (default)
    Browse,

    /// List the mesocycles
    Mesocycles {
        #[arg(long)]
        json: bool,
    },

    /// Show one mesocycle
    Mesocycle {
        id: MesocycleId,

        /// Include objectives, weeks, sessions and exercises
        #[arg(long)]
        detail: bool,

        #[arg(long)]
        json: bool,
    },

    /// List the weekly blocks of a mesocycle
    Sessions {
        mesocycle_id: MesocycleId,

        #[arg(long)]
        json: bool,
    },

    /// Show the plan header
    Plan {
        #[arg(long)]
        json: bool,
    },

    /// List the basic material
    Material {
        #[arg(long)]
        json: bool,
    },

    /// Ask the catalog service to seed its data
    InitData,

    /// Check that the catalog service is up
    Health,

    /// Report catalog data-quality findings
    Check,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    training_core::logging::init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{:?}", err);
            eprintln!("error: {}", err);
            if matches!(err, Error::Transport(_)) {
                eprintln!("{}", err.user_message());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let gateway = build_gateway(&cli, &config)?;
    let gateway = gateway.as_ref();

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            let stdin = io::stdin();
            browse::run(gateway, stdin.lock(), io::stdout()).await
        }
        Commands::Mesocycles { json } => cmd_mesocycles(gateway, json).await,
        Commands::Mesocycle { id, detail, json } => cmd_mesocycle(gateway, id, detail, json).await,
        Commands::Sessions { mesocycle_id, json } => cmd_sessions(gateway, mesocycle_id, json).await,
        Commands::Plan { json } => cmd_plan(gateway, json).await,
        Commands::Material { json } => cmd_material(gateway, json).await,
        Commands::InitData => {
            let ack = gateway.init_data().await?;
            println!("✓ {}", ack.message);
            Ok(())
        }
        Commands::Health => {
            let ack = gateway.health().await?;
            println!("✓ {}", ack.message);
            Ok(())
        }
        Commands::Check => cmd_check(gateway).await,
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => Config::load()?,
    };

    if let Some(url) = &cli.base_url {
        config.backend.base_url = Some(url.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config.backend.timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn build_gateway(cli: &Cli, config: &Config) -> Result<Box<dyn CatalogGateway>> {
    if cli.offline {
        tracing::info!("Using the built-in catalog");
        return Ok(Box::new(StaticGateway::seeded()));
    }
    let gateway = HttpGateway::from_config(&config.backend)?;
    tracing::info!("Using catalog service at {}", gateway.api_base());
    Ok(Box::new(gateway))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

async fn cmd_mesocycles(gateway: &dyn CatalogGateway, json: bool) -> Result<()> {
    let mesocycles = gateway.list_mesocycles().await?;
    if json {
        return print_json(&mesocycles);
    }

    for m in &mesocycles {
        println!(
            "[{}] {} · {} ({} weeks)",
            m.id, m.month_label, m.name, m.weeks
        );
    }
    Ok(())
}

async fn cmd_mesocycle(
    gateway: &dyn CatalogGateway,
    id: MesocycleId,
    detail: bool,
    json: bool,
) -> Result<()> {
    if !detail {
        let m = gateway.get_mesocycle(id).await?;
        if json {
            return print_json(&m);
        }
        let mut out = io::stdout().lock();
        browse::write_mesocycle_header(&mut out, &m)?;
        return Ok(());
    }

    let d = gateway.get_mesocycle_detail(id).await?;
    if json {
        return print_json(&d);
    }

    let mut out = io::stdout().lock();
    browse::write_mesocycle(&mut out, &d)?;
    for s in d.sessions() {
        writeln!(out)?;
        writeln!(out, "  [{}] {}", s.id, s.name)?;
        for (n, e) in s.exercises.iter().enumerate() {
            writeln!(out, "     {}. {} ({} min)", n + 1, e.name, e.duration_minutes)?;
        }
    }
    Ok(())
}

async fn cmd_sessions(
    gateway: &dyn CatalogGateway,
    mesocycle_id: MesocycleId,
    json: bool,
) -> Result<()> {
    let weeks = gateway.list_sessions_of_mesocycle(mesocycle_id).await?;
    if json {
        return print_json(&weeks);
    }

    if weeks.is_empty() {
        println!("No sessions for mesocycle {}.", mesocycle_id);
        return Ok(());
    }
    let mut out = io::stdout().lock();
    for w in &weeks {
        browse::write_week(&mut out, w)?;
    }
    Ok(())
}

async fn cmd_plan(gateway: &dyn CatalogGateway, json: bool) -> Result<()> {
    let plan = gateway.get_full_plan().await?;
    if json {
        return print_json(&plan);
    }

    println!("{}", plan.title);
    println!("  {}", plan.description);
    println!("  Category: {}", plan.category);
    println!(
        "  {} months · {} sessions per week · {} min per session",
        plan.duration_months, plan.sessions_per_week, plan.session_minutes
    );
    println!("  Mesocycles:");
    for m in &plan.mesocycles {
        println!("    [{}] {} · {}", m.id, m.month_label, m.name);
    }
    Ok(())
}

async fn cmd_material(gateway: &dyn CatalogGateway, json: bool) -> Result<()> {
    let material = gateway.get_basic_material().await?;
    if json {
        return print_json(&material);
    }

    for item in &material {
        println!("• {}", item);
    }
    Ok(())
}

async fn cmd_check(gateway: &dyn CatalogGateway) -> Result<()> {
    let snapshot = PlanSnapshot::fetch(gateway).await?;
    let findings = snapshot.data_quality();

    if findings.is_empty() {
        println!("✓ Catalog is consistent");
        return Ok(());
    }

    println!("Catalog data-quality findings:");
    for finding in &findings {
        println!("  - {}", finding);
    }
    Ok(())
}
