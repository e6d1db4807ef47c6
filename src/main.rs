use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gantt_tj::merge::MergeConfig;
use gantt_tj::model::DEFAULT_HOURS_PER_DAY;
use gantt_tj::sync::{self, ProjectHeader, SourcePair};
use gantt_tj::{Result, ToolError};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert(args) => execute_convert(args),
    }
}

fn execute_convert(args: ConvertArgs) -> Result<()> {
    if args.xlsx.len() != args.xml.len() {
        return Err(ToolError::MismatchedSources {
            xlsx: args.xlsx.len(),
            xml: args.xml.len(),
        });
    }
    for path in args.xlsx.iter().chain(args.xml.iter()) {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.clone()));
        }
    }

    let pairs: Vec<SourcePair> = args
        .xlsx
        .into_iter()
        .zip(args.xml)
        .map(|(xlsx, xml)| SourcePair { xlsx, xml })
        .collect();
    let header = ProjectHeader {
        id: args.project_id,
        name: args.project_name,
        start: args.start,
        end: args.end,
    };
    let config = MergeConfig {
        hours_per_day: args.hours_per_day,
        sentinel: args.sentinel,
    };

    sync::export(&pairs, &header, &config, args.report, &args.output)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert project-management exports into a TaskJuggler project file."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one or more export pairs into a project description.
    Convert(ConvertArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Spreadsheet export; repeat to mix several projects into one file.
    #[arg(long = "xlsx", required = true)]
    xlsx: Vec<PathBuf>,

    /// XML export matching each --xlsx, in order.
    #[arg(long = "xml", required = true)]
    xml: Vec<PathBuf>,

    /// Output file path.
    #[arg(long)]
    output: PathBuf,

    /// Identifier used in the project declaration.
    #[arg(long, default_value = "pj")]
    project_id: String,

    /// Project display name.
    #[arg(long, default_value = "pj")]
    project_name: String,

    /// Project start date (YYYY-MM-DD).
    #[arg(long)]
    start: String,

    /// Project end: a date or a duration offset such as +2m.
    #[arg(long)]
    end: String,

    /// Append the static task report block.
    #[arg(long)]
    report: bool,

    /// Name substituted when a task row has no assignee.
    #[arg(long, default_value = "Ghost")]
    sentinel: String,

    /// Daily-hour cap for extracted resources.
    #[arg(long, default_value_t = DEFAULT_HOURS_PER_DAY)]
    hours_per_day: u32,
}
