use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use concall::{
    AnthropicClient, AnthropicConfig, AutoDocumentReader, DocumentLocator, DocumentReader,
    HumanTranscript, JsonStore, LayoutConfig, Role, RosterSubstringClassifier, TranscriptMetadata,
    TranscriptService, TranscriptStore, reconstruct, write_summary_json, write_table_json,
};

#[derive(Parser)]
#[command(name = "concall")]
#[command(author, version, about = "Earnings-call transcript reconstruction and summarization", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Directory holding transcript documents
    #[arg(long, default_value = "./pdfs")]
    pdf_dir: PathBuf,

    /// Document file extension
    #[arg(long, default_value = "pdf")]
    extension: String,

    /// JSON file with extra entity aliases ({"aliases": {"ENTITY": "slug"}})
    #[arg(long)]
    aliases: Option<PathBuf>,

    /// Directory for stored transcripts and summaries
    #[arg(long, default_value = "./store")]
    store_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct the speaker-turn table of a call
    Reconstruct {
        /// Entity identifier (e.g. HDFCBANK.NS)
        #[arg(short, long)]
        entity: String,

        /// Reporting period (e.g. 2025Q1)
        #[arg(short, long)]
        period: String,

        /// Read this document instead of resolving one from --pdf-dir
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file for the transcript table (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for human-readable transcript (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate summaries of a call (requires ANTHROPIC_API_KEY)
    Summarize {
        /// Entity identifier (e.g. HDFCBANK.NS)
        #[arg(short, long)]
        entity: String,

        /// Reporting period (e.g. 2025Q1)
        #[arg(short, long)]
        period: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file for the summaries (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Reconstruct a document and report on the result without storing it
    Analyze {
        /// Transcript document (PDF, or text with form-feed page breaks)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Reconstruct {
            entity,
            period,
            input,
            source,
            output,
            human_readable,
            verbose,
        } => {
            setup_logging(verbose);
            reconstruct_transcript(entity, period, input, source, output, human_readable)
        }
        Commands::Summarize {
            entity,
            period,
            source,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            summarize_transcript(entity, period, source, output).await
        }
        Commands::Analyze { input, verbose } => {
            setup_logging(verbose);
            analyze_transcript(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_service(
    source: SourceArgs,
) -> Result<TranscriptService<JsonStore, AutoDocumentReader, RosterSubstringClassifier>> {
    let mut locator = DocumentLocator::new(source.pdf_dir).with_extension(source.extension);
    if let Some(aliases) = &source.aliases {
        locator = locator
            .with_alias_file(aliases)
            .with_context(|| format!("Failed to load aliases from {:?}", aliases))?;
    }

    Ok(TranscriptService::new(
        JsonStore::new(source.store_dir),
        AutoDocumentReader,
        locator,
        RosterSubstringClassifier,
    ))
}

fn reconstruct_transcript(
    entity: String,
    period: String,
    input: Option<PathBuf>,
    source: SourceArgs,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
) -> Result<()> {
    let service = build_service(source)?;

    let table = match input {
        Some(path) => {
            let entity = concall::service::normalize_entity(&entity);
            let pages = service.reader.read_pages(&path)?;
            let table = reconstruct(&pages, &service.layout, &service.classifier, &entity, &period)
                .with_context(|| format!("Failed to reconstruct {:?}", path))?;
            service.store.upsert_table(&table)?;
            table
        }
        None => service
            .transcript(&entity, &period)
            .with_context(|| format!("Failed to load transcript for {} {}", entity, period))?,
    };

    info!(
        "{} {}: {} turns, Q&A starts at {:?}",
        table.entity,
        table.period,
        table.len(),
        table.first_question_index()
    );

    if let Some(path) = output {
        write_table_json(&table, &path)?;
        info!("Output written to {:?}", path);
    }
    if let Some(path) = human_readable {
        HumanTranscript::new(&table).write_file(&path)?;
        info!("Human-readable output written to {:?}", path);
    }

    Ok(())
}

async fn summarize_transcript(
    entity: String,
    period: String,
    source: SourceArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let service = build_service(source)?;
    let client = AnthropicClient::new(AnthropicConfig::from_env()?)?;

    let summary = service.summary(&entity, &period, &client).await?;

    match output {
        Some(path) => {
            write_summary_json(&summary, &path)?;
            info!("Summary written to {:?}", path);
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn analyze_transcript(input: PathBuf) -> Result<()> {
    info!("Analyzing transcript from {:?}", input);
    let pages = AutoDocumentReader.read_pages(&input)?;
    let table = reconstruct(
        &pages,
        &LayoutConfig::default(),
        &RosterSubstringClassifier,
        "-",
        "-",
    )
    .context("Failed to reconstruct transcript")?;
    let metadata = TranscriptMetadata::from_table(&table);

    println!("Transcript Analysis");
    println!("==================");
    println!("Pages: {}", pages.len());
    println!("Total turns: {}", metadata.total_turns);
    println!("Management turns: {}", metadata.management_turns);
    println!("Question turns: {}", metadata.question_turns);
    println!("Moderator turns: {}", metadata.moderator_turns);
    match metadata.first_question_index {
        Some(index) => println!("Q&A starts at turn {}", index),
        None => println!("No analyst questions found"),
    }
    println!("Turns with empty speaker: {}", metadata.defective_turns);
    println!();

    println!("Speakers");
    println!("--------");
    let mut speakers: Vec<(&str, Role, usize)> = Vec::new();
    for turn in table.turns() {
        match speakers.iter_mut().find(|(s, _, _)| *s == turn.speaker) {
            Some(entry) => entry.2 += 1,
            None => speakers.push((turn.speaker.as_str(), turn.role, 1)),
        }
    }
    for (speaker, role, turns) in speakers {
        let words: usize = table
            .turns()
            .iter()
            .filter(|t| t.speaker == speaker)
            .map(|t| t.utterance.split_whitespace().count())
            .sum();
        println!("{} ({}): {} turns, {} words", speaker, role, turns, words);
    }

    Ok(())
}
