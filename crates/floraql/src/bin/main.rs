//! floraql command-line interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use floraql::SelectOptions;
use floraql::cli::output::ColorMode;
use floraql::cli::{commands, logger, output};
use std::path::PathBuf;

/// floraql command-line tool
#[derive(Parser)]
#[command(name = "floraql")]
#[command(author, version, about = "Parse select, filter and order expressions into JSON", long_about = None)]
struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Filter configuration file (JSON operator table)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Deepest bracket nesting to accept (overrides the configuration)
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a select expression
    Select {
        /// Select expression, e.g. `title,instruments(limit=3).quotations`
        expression: String,

        /// Allow `{name}` placeholders as top-level attribute names
        #[arg(long)]
        enable_braces: bool,
    },

    /// Parse a filter expression into disjunctive normal form
    Filter {
        /// Filter expression, e.g. `type.id=1,2 AND price=10..20`
        expression: String,
    },

    /// Parse an order expression
    Order {
        /// Order expression, e.g. `name:asc,date:desc`
        expression: String,
    },

    /// Parse a whole request object
    Request {
        /// JSON file holding the request (reads stdin if not given)
        file: Option<PathBuf>,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(cli.color);
    logger::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut options = SelectOptions::default().with_filter(commands::load_config(cli.config.as_deref())?);
    if let Some(depth) = cli.max_depth {
        options.filter = options.filter.with_max_depth(depth);
        options = options.with_max_depth(depth);
    }

    let value = match &cli.command {
        Commands::Select {
            expression,
            enable_braces,
        } => commands::select(expression, &options.clone().with_braces(*enable_braces))?,
        Commands::Filter { expression } => commands::filter(expression, &options.filter)?,
        Commands::Order { expression } => commands::order(expression)?,
        Commands::Request { file } => commands::request(file.as_deref(), &options)?,
    };

    let content = output::format_json(&value, cli.pretty)?;
    output::write_output(&content, cli.output.as_deref())
}
