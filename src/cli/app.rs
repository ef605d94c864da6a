//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{bind, components, inspect, plugins, token_cmd};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "propbind")]
#[command(author, version, about = "Bind data sources to typed component props and slots")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new propbind project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Normalize a value against a prop definition
    Normalize {
        /// Prop definition, as JSON or @file (JSON or YAML)
        #[arg(long, short)]
        definition: String,

        /// Prop type id (resolved from the definition by default)
        #[arg(long, short = 't')]
        prop_type: Option<String>,

        /// Value as JSON; anything else is taken as a string
        value: String,
    },

    /// Show the enum options of a prop definition
    Options {
        /// Prop definition, as JSON or @file (JSON or YAML)
        #[arg(long, short)]
        definition: String,
    },

    /// Replace token placeholders in a template
    Token {
        /// Template, e.g. "Hello [user:name]"
        template: String,

        /// Entity providing token values, as JSON or @file
        #[arg(long, short)]
        entity: Option<String>,

        /// Leave unmatched placeholders in place
        #[arg(long)]
        keep_unmatched: bool,

        /// Escape values for HTML output
        #[arg(long)]
        html: bool,
    },

    /// Browse the component catalog
    #[command(subcommand)]
    Components(components::ComponentCommands),

    /// Resolve a component's props and slots from a binding file
    Bind {
        /// Binding file (YAML)
        file: PathBuf,
    },

    /// List prop types
    PropTypes,

    /// List sources
    Sources {
        /// Only sources able to feed this prop type
        #[arg(long, short = 't')]
        prop_type: Option<String>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load()?.global.default_format.into(),
    };
    let output = Output::new(format);

    tracing::debug!("propbind starting");

    match cli.command {
        Commands::Init { path } => {
            tracing::debug!(path = %path.display(), "Initializing project");
            let project = Project::init(&path)?;
            let root = project.root().unwrap_or(path.as_path());
            output.success(&format!("Initialized propbind project at {}", root.display()));
        }

        Commands::Normalize {
            definition,
            prop_type,
            value,
        } => inspect::normalize(&output, &definition, prop_type.as_deref(), &value)?,

        Commands::Options { definition } => inspect::options(&output, &definition)?,

        Commands::Token {
            template,
            entity,
            keep_unmatched,
            html,
        } => token_cmd::run(
            &output,
            token_cmd::TokenArgs {
                template: &template,
                entity: entity.as_deref(),
                keep_unmatched,
                html,
            },
        )?,

        Commands::Components(cmd) => components::run(cmd, &output)?,

        Commands::Bind { file } => bind::run(&output, &file)?,

        Commands::PropTypes => plugins::prop_types(&output)?,

        Commands::Sources { prop_type } => plugins::sources(&output, prop_type.as_deref())?,
    }

    tracing::debug!("Command completed successfully");
    Ok(())
}

/// Installs the log subscriber on stderr.
///
/// `RUST_LOG` wins; otherwise `--verbose` shows debug output and warnings
/// are shown by default.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("propbind={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}
