use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use sc_app::{
    AppConfig, AppError, AppResult, AppliedTo, ScenarioStore, baseline_service, catalog,
    parameter_service, scenario_service, timeline_service, vitals_service,
};
use sc_core::{AccessKind, Baseline, NodeIndex, ScenarioId, VascularAccess};
use sc_timeline::{TimelineBuilder, TimelineGraph};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATABASE: &str = "scenaria.db";

#[derive(Parser)]
#[command(name = "scenaria")]
#[command(
    about = "Scenaria CLI - author clinical training scenarios and their timelines",
    long_about = None
)]
struct Cli {
    /// Configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database file, overrides the configuration
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage scenarios
    #[command(subcommand)]
    Scenario(ScenarioCommands),
    /// Show or replace a scenario baseline
    #[command(subcommand)]
    Baseline(BaselineCommands),
    /// Import or show a scenario timeline
    #[command(subcommand)]
    Timeline(TimelineCommands),
    /// Edit one vital sign (mirrored between baseline and node 0)
    Vital {
        scenario: i64,
        /// Field name or monitor label (FC, PA, SpO2, ...); other names become parameters
        field: String,
        /// New value; an empty string clears the field
        value: String,
        /// Target node; omit for the baseline
        #[arg(long)]
        node: Option<u32>,
    },
    /// Edit one timeline node
    #[command(subcommand)]
    Node(NodeCommands),
    /// Additional parameters of a node
    #[command(subcommand)]
    Params(ParamCommands),
    /// List the predefined additional parameters
    Catalog,
}

#[derive(Subcommand)]
enum ScenarioCommands {
    /// Create a scenario with an empty baseline
    Create {
        title: String,
        #[arg(long)]
        pediatric: bool,
    },
    /// List scenarios
    List,
    /// Delete a scenario and everything it owns
    Delete { scenario: i64 },
}

#[derive(Subcommand)]
enum BaselineCommands {
    /// Print the baseline as JSON
    Show { scenario: i64 },
    /// Replace the baseline from a YAML file
    Set { scenario: i64, file: PathBuf },
    /// Add a vascular access
    AddAccess {
        scenario: i64,
        /// venous or arterial
        kind: String,
        category: String,
        site: String,
        #[arg(long, default_value = "")]
        side: String,
        #[arg(long)]
        gauge: Option<i32>,
    },
    /// Set the monitor description
    Monitor { scenario: i64, text: String },
}

#[derive(Subcommand)]
enum TimelineCommands {
    /// Replace the timeline from a YAML file
    Import { scenario: i64, file: PathBuf },
    /// Print the timeline as JSON
    Show { scenario: i64 },
}

#[derive(Subcommand)]
enum NodeCommands {
    /// Delete a node and its parameters
    Delete { scenario: i64, index: u32 },
    /// Set the action and both successors
    Branch {
        scenario: i64,
        index: u32,
        action: String,
        done: i64,
        not_done: i64,
    },
    /// Set the node timer in seconds
    Timer { scenario: i64, index: u32, seconds: i64 },
    /// Set or clear the free-text notes
    Notes {
        scenario: i64,
        index: u32,
        text: Option<String>,
    },
    /// Set or clear the caregiver role (pediatric scenarios)
    Caregiver {
        scenario: i64,
        index: u32,
        text: Option<String>,
    },
}

#[derive(Subcommand)]
enum ParamCommands {
    /// List parameters of a node
    List { scenario: i64, node: u32 },
    /// Add or update a parameter
    Set {
        scenario: i64,
        node: u32,
        name: String,
        value: String,
        #[arg(long)]
        unit: Option<String>,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    }
    .with_database(cli.db.clone());

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config.log_level)?)
        .with_writer(std::io::stderr)
        .init();

    let mut options = config.store.clone();
    if options.path.is_none() {
        options.path = Some(PathBuf::from(DEFAULT_DATABASE));
    }
    debug!(config = ?cli.config, database = ?options.path, "opening scenario store");
    let mut store = ScenarioStore::open(&options)?;

    match cli.command {
        Commands::Scenario(cmd) => cmd_scenario(&mut store, cmd),
        Commands::Baseline(cmd) => cmd_baseline(&mut store, cmd),
        Commands::Timeline(cmd) => cmd_timeline(&mut store, cmd),
        Commands::Vital {
            scenario,
            field,
            value,
            node,
        } => {
            let (scenario, node) = (ScenarioId::new(scenario), node.map(NodeIndex::new));
            cmd_vital(&mut store, scenario, node, &field, &value)
        }
        Commands::Node(cmd) => cmd_node(&mut store, cmd),
        Commands::Params(cmd) => cmd_params(&mut store, cmd),
        Commands::Catalog => {
            cmd_catalog();
            Ok(())
        }
    }
}

fn cmd_scenario(store: &mut ScenarioStore, cmd: ScenarioCommands) -> AppResult<()> {
    match cmd {
        ScenarioCommands::Create { title, pediatric } => {
            let id = scenario_service::create(store, &title, pediatric)?;
            println!("✓ Created scenario {}", id);
        }
        ScenarioCommands::List => {
            let scenarios = scenario_service::list(store)?;
            if scenarios.is_empty() {
                println!("No scenarios found");
            }
            for s in scenarios {
                let kind = if s.pediatric { "pediatric" } else { "adult" };
                println!(
                    "  {} - {} ({}, created {})",
                    s.id,
                    s.title,
                    kind,
                    s.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        ScenarioCommands::Delete { scenario } => {
            if scenario_service::delete(store, ScenarioId::new(scenario))? {
                println!("✓ Deleted scenario {}", scenario);
            } else {
                println!("Scenario {} did not exist", scenario);
            }
        }
    }
    Ok(())
}

fn cmd_baseline(store: &mut ScenarioStore, cmd: BaselineCommands) -> AppResult<()> {
    match cmd {
        BaselineCommands::Show { scenario } => {
            let baseline = baseline_service::load(store, ScenarioId::new(scenario))?;
            print_json(&baseline)?;
        }
        BaselineCommands::Set { scenario, file } => {
            let baseline: Baseline = read_yaml(&file)?;
            baseline_service::save(store, ScenarioId::new(scenario), &baseline)?;
            println!("✓ Baseline saved");
        }
        BaselineCommands::AddAccess {
            scenario,
            kind,
            category,
            site,
            side,
            gauge,
        } => {
            let kind = AccessKind::parse(&kind)?;
            let access = VascularAccess {
                side,
                gauge,
                ..VascularAccess::new(category, site)
            };
            let id = baseline_service::add_access(store, ScenarioId::new(scenario), kind, &access)?;
            println!("✓ Added {} access {}", kind, id);
        }
        BaselineCommands::Monitor { scenario, text } => {
            baseline_service::update_monitor(store, ScenarioId::new(scenario), &text)?;
            println!("✓ Monitor updated");
        }
    }
    Ok(())
}

fn cmd_timeline(store: &mut ScenarioStore, cmd: TimelineCommands) -> AppResult<()> {
    match cmd {
        TimelineCommands::Import { scenario, file } => {
            let raw: TimelineGraph = read_yaml(&file)?;
            let graph = raw
                .into_nodes()
                .into_iter()
                .collect::<TimelineBuilder>()
                .build()?;
            for (from, to) in graph.dangling_successors() {
                println!("  note: node {} points at missing node {}", from, to);
            }
            let summary = timeline_service::save(store, ScenarioId::new(scenario), &graph)?;
            println!(
                "✓ Timeline saved ({} nodes, {} parameters)",
                summary.nodes, summary.parameters
            );
        }
        TimelineCommands::Show { scenario } => {
            let graph = timeline_service::load(store, ScenarioId::new(scenario))?;
            print_json(&graph)?;
        }
    }
    Ok(())
}

fn cmd_vital(
    store: &mut ScenarioStore,
    scenario: ScenarioId,
    node: Option<NodeIndex>,
    field: &str,
    value: &str,
) -> AppResult<()> {
    match vitals_service::apply(store, scenario, node, field, value)? {
        AppliedTo::Baseline => println!("✓ Baseline updated (no root node to mirror)"),
        AppliedTo::BaselineAndRoot => println!("✓ Baseline and node 0 updated"),
        AppliedTo::Node(index) => println!("✓ Node {} updated", index),
        AppliedTo::Parameter { node, id } => {
            println!("✓ Parameter {} set on node {} (id {})", field.trim(), node, id)
        }
    }
    Ok(())
}

fn cmd_node(store: &mut ScenarioStore, cmd: NodeCommands) -> AppResult<()> {
    match cmd {
        NodeCommands::Delete { scenario, index } => {
            let (scenario, index) = (ScenarioId::new(scenario), NodeIndex::new(index));
            let removed = timeline_service::delete_node(store, scenario, index)?;
            if removed {
                println!("✓ Deleted node {}", index);
            } else {
                println!("Node {} did not exist", index);
            }
        }
        NodeCommands::Branch {
            scenario,
            index,
            action,
            done,
            not_done,
        } => {
            let (scenario, index) = (ScenarioId::new(scenario), NodeIndex::new(index));
            timeline_service::set_branch(store, scenario, index, &action, done, not_done)?;
            println!("✓ Node {} branches to {} / {}", index, done, not_done);
        }
        NodeCommands::Timer {
            scenario,
            index,
            seconds,
        } => {
            let (scenario, index) = (ScenarioId::new(scenario), NodeIndex::new(index));
            timeline_service::set_timer(store, scenario, index, seconds)?;
            println!("✓ Timer set to {} s", seconds);
        }
        NodeCommands::Notes {
            scenario,
            index,
            text,
        } => {
            timeline_service::set_notes(
                store,
                ScenarioId::new(scenario),
                NodeIndex::new(index),
                text.as_deref(),
            )?;
            println!("✓ Notes updated");
        }
        NodeCommands::Caregiver {
            scenario,
            index,
            text,
        } => {
            let scenario = ScenarioId::new(scenario);
            let index = NodeIndex::new(index);
            timeline_service::set_caregiver_role(store, scenario, index, text.as_deref())?;
            if !timeline_service::is_pediatric(store, scenario)? {
                println!("  note: scenario {} is not pediatric; role not shown", scenario);
            }
            println!("✓ Caregiver role updated");
        }
    }
    Ok(())
}

fn cmd_params(store: &mut ScenarioStore, cmd: ParamCommands) -> AppResult<()> {
    match cmd {
        ParamCommands::List { scenario, node } => {
            let (scenario, index) = (ScenarioId::new(scenario), NodeIndex::new(node));
            let params = parameter_service::list_for(store, scenario, index)?;
            if params.is_empty() {
                println!("No additional parameters on node {}", node);
            }
            for p in params {
                println!("  [{}] {} = {} {}", p.id, p.name, p.value_text(), p.unit);
            }
        }
        ParamCommands::Set {
            scenario,
            node,
            name,
            value,
            unit,
        } => {
            let id = parameter_service::upsert_text(
                store,
                ScenarioId::new(scenario),
                NodeIndex::new(node),
                &name,
                &value,
                unit.as_deref(),
            )?;
            println!("✓ Parameter {} saved (id {})", name.trim(), id);
        }
    }
    Ok(())
}

fn cmd_catalog() {
    println!("Predefined additional parameters:");
    for entry in catalog::CATALOG {
        println!("  {:<6} {}", entry.key, catalog::display_label(entry));
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_yaml::from_str(&content)
        .map_err(|e| AppError::InvalidInput(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Subscriber filter from the configured level, e.g. "debug" or "sc_app=debug,info".
fn log_filter(directives: &str) -> AppResult<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| AppError::Config(format!("Invalid log_level '{}': {}", directives, e)))
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::InvalidInput(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
