use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use treebank_analytics::{
    analyze_graphs, evaluate, Analyzer, Config, Scorer, Table, TableFormat,
};
use treebank_formats::io::{ReadGraph, WriteGraph};
use treebank_formats::{Error as FormatError, Format};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "treebank-analytics: convert, analyze and evaluate dependency graph treebanks",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert from one format to another.
    ///
    /// Readable formats: sequoia, sagae, sdp, sdp2015, linearize, penman.
    /// Writable formats: sequoia, sagae, linearize, penman, tikz.
    Convert(ConvertArgs),

    /// Evaluate a system output against a reference.
    Eval(EvalArgs),

    /// Analyze a corpus to extract meaningful information.
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Convert from this format.
    #[arg(short, long)]
    from: Format,

    /// Convert to this format.
    #[arg(short, long)]
    to: Format,

    /// Input file (default: standard input).
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CorpusArgs {
    /// Configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Gold (reference) file.
    #[arg(short, long, value_name = "FILE")]
    gold: PathBuf,

    /// Format of the files to read.
    #[arg(short, long, default_value = "sequoia")]
    format: Format,

    /// Table format: csv or latex.
    #[arg(short, long, default_value = "csv")]
    table: TableFormat,

    /// Lowercase edge labels.
    #[arg(short, long)]
    lower: bool,
}

#[derive(Args, Debug)]
struct EvalArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// System file.
    #[arg(short, long, value_name = "FILE")]
    system: PathBuf,

    /// Format of the gold file.
    #[arg(short = 'F', long, default_value = "sequoia")]
    gold_format: Format,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    corpus: CorpusArgs,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TREEBANK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn read_config(path: &Path) -> Result<Config> {
    Config::from_reader(open(path)?)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

fn print_tables<I>(tables: I, format: TableFormat, show_names: bool) -> Result<()>
where
    I: IntoIterator<Item = (&'static str, Table)>,
{
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for (name, table) in tables {
        if show_names {
            writeln!(out, "{}", name)?;
        }
        writeln!(out, "{}", format.format(&table))?;
    }

    out.flush()?;

    Ok(())
}

fn convert(args: &ConvertArgs) -> Result<()> {
    let input: Box<dyn BufRead> = match &args.path {
        Some(path) => Box::new(open(path)?),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let reader = args.from.reader(input, false)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut writer = args.to.writer(&mut out)?;

    let mut converted = 0;
    let mut skipped = 0;
    for (idx, graph) in reader.graphs().enumerate() {
        let graph = match graph {
            Ok(graph) => graph,
            Err(FormatError::IO(err)) => return Err(err).context("Cannot read graphs"),
            Err(err) => {
                warn!(sentence = idx + 1, "Skipping unreadable sentence: {}", err);
                skipped += 1;
                continue;
            }
        };

        match writer.write_graph(&graph) {
            Ok(()) => converted += 1,
            Err(FormatError::IO(err)) => return Err(err).context("Cannot write graphs"),
            Err(err) => {
                warn!(
                    sentence = idx + 1,
                    id = graph.id().unwrap_or("-"),
                    "Skipping sentence: {}",
                    err
                );
                skipped += 1;
            }
        }
    }

    drop(writer);
    out.flush()?;

    info!(converted, skipped, from = %args.from, to = %args.to, "Conversion done");

    Ok(())
}

fn eval(args: &EvalArgs) -> Result<()> {
    let config = read_config(&args.corpus.config)?;
    let mut scorers = config
        .scorer_kinds()?
        .into_iter()
        .map(|kind| kind.build(&config))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        scorers = ?scorers.iter().map(|scorer| scorer.name()).collect::<Vec<_>>(),
        "Evaluating"
    );

    let golds = args
        .gold_format
        .reader(open(&args.corpus.gold)?, args.corpus.lower)?;
    let systems = args
        .corpus
        .format
        .reader(open(&args.system)?, args.corpus.lower)?;

    let evaluation = evaluate(&mut scorers, golds.graphs(), systems.graphs())?;
    info!(sentences = evaluation.sentences, "Evaluation done");

    print_tables(
        scorers.iter().map(|scorer| (scorer.name(), scorer.table())),
        args.corpus.table,
        config.general.show_name_scorers,
    )
}

fn analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = read_config(&args.corpus.config)?;
    let mut analyzers = config
        .analyzer_kinds()?
        .into_iter()
        .map(|kind| kind.build(&config))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        analyzers = ?analyzers.iter().map(|analyzer| analyzer.name()).collect::<Vec<_>>(),
        "Analyzing"
    );

    let graphs = args
        .corpus
        .format
        .reader(open(&args.corpus.gold)?, args.corpus.lower)?;

    let n_graphs = analyze_graphs(&mut analyzers, graphs.graphs())?;
    info!(graphs = n_graphs, "Analysis done");

    print_tables(
        analyzers
            .iter()
            .map(|analyzer| (analyzer.name(), analyzer.table())),
        args.corpus.table,
        config.general.show_name_analyzers,
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert(args) => convert(&args),
        Commands::Eval(args) => eval(&args),
        Commands::Analyze(args) => analyze(&args),
    }
}
