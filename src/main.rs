use clap::{Parser as ClapParser, Subcommand};
use funcadl_lower::LoweringConfig;
use funcadl_lower::cli::{self, CliError, LowerOptions, LowerOutput};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(ClapParser)]
#[command(name = "funcadl-lower")]
#[command(about = "Lower LINQ-style query trees into columnar array expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a JSON-encoded query tree
    Lower {
        /// The query tree as JSON (reads --input or stdin if not provided)
        query: Option<String>,

        /// File holding the query tree
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSON lowering configuration file
        #[arg(short, long, env = "FUNCADL_LOWER_CONFIG")]
        config: Option<PathBuf>,

        /// Additional host global names
        #[arg(short, long = "global")]
        globals: Vec<String>,

        /// Reject dataset references with more than one source
        #[arg(long)]
        single_source: bool,

        /// Maximum node nesting depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Print a JSON document with the expression and its runtime overrides
        #[arg(long)]
        json: bool,
    },

    /// Print the default lowering configuration
    Config,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lower {
            query,
            input,
            config,
            globals,
            single_source,
            max_depth,
            json,
        } => run_lower(query, input, config, globals, single_source, max_depth, json),
        Commands::Config => serde_json::to_string_pretty(&LoweringConfig::default())
            .map(|s| println!("{}", s))
            .map_err(CliError::Json),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_writer(io::stderr)
        .with_env_filter(env_filter)
        .finish();
    // Only fails when a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run_lower(
    query: Option<String>,
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    globals: Vec<String>,
    single_source: bool,
    max_depth: Option<usize>,
    json: bool,
) -> Result<(), CliError> {
    let input = match (query, input) {
        (Some(q), _) => Some(q),
        (None, Some(path)) => Some(std::fs::read_to_string(path)?),
        (None, None) if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        (None, None) => None,
    };

    let mut config = match config {
        Some(path) => LoweringConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => LoweringConfig::default(),
    };
    config.single_source |= single_source;
    if let Some(depth) = max_depth {
        config.max_depth = depth;
    }

    let options = LowerOptions {
        input,
        config,
        globals,
        json,
    };

    match cli::execute_lower(&options)? {
        LowerOutput::Expression(expression) => println!("{}", expression),
        LowerOutput::Document(lowered) => {
            println!("{}", serde_json::to_string_pretty(&lowered)?);
        }
    }
    Ok(())
}
