use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use claimlens_core::{Claim, ChunkParams, Config, Gender};
use cli::read_document;
use engine::Evaluator;
use index::{DocumentSession, RetrievalParams};
use llm::ChatClient;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "claimlens")]
#[command(about = "Policy-grounded insurance claim evaluation")]
struct Cli {
  /// Config file path (default: ~/.config/claimlens/config.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Evaluate a structured claim against a policy document
  Evaluate {
    /// Policy document (txt, md or html)
    document: PathBuf,
    /// Patient age in years
    #[arg(long)]
    age: u32,
    /// Patient gender (male/female)
    #[arg(long)]
    gender: String,
    /// Procedure being claimed
    #[arg(long)]
    procedure: String,
    /// Treatment city
    #[arg(long)]
    location: String,
    /// Policy duration in months
    #[arg(long)]
    months: u32,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Evaluate a claim described in natural language
  Query {
    /// Policy document (txt, md or html)
    document: PathBuf,
    /// Free-text claim description, e.g. "46M, knee surgery in Pune, 3-month policy"
    text: String,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Show the chunks the retriever would feed the evaluator, without calling the model
  Inspect {
    /// Policy document (txt, md or html)
    document: PathBuf,
    /// Free-text claim description
    text: String,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
}

fn init_cli_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
    .with_writer(std::io::stderr)
    .init();
}

fn ingest(path: &Path, config: &Config) -> Result<DocumentSession> {
  let text = read_document(path).with_context(|| format!("reading {}", path.display()))?;
  let title = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.display().to_string());

  let session = DocumentSession::ingest(
    &title,
    &path.display().to_string(),
    &text,
    &ChunkParams {
      chunk_size: config.chunking.chunk_size,
      overlap: config.chunking.overlap,
    },
    RetrievalParams {
      top_k: config.retrieval.top_k,
      distance_threshold: config.retrieval.distance_threshold,
    },
  )?;
  Ok(session)
}

async fn run_evaluation(session: &DocumentSession, claim: &Claim, config: &Config, json: bool) -> Result<()> {
  let chunks = session.retrieve_for_claim(claim)?;

  let client = ChatClient::from_config(&config.model)?;
  let evaluator = Evaluator::new(client);
  let decision = evaluator.evaluate(claim, &chunks).await;

  if json {
    println!("{}", serde_json::to_string_pretty(&decision)?);
  } else {
    println!("Decision:   {}", decision.verdict.as_str().to_uppercase());
    println!("Amount:     ₹{}", decision.amount);
    println!("Confidence: {:.0}%", decision.confidence * 100.0);
    println!();
    println!("{}", decision.justification.trim());
    println!();
    println!("{}", decision.trace.breakdown());
  }
  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  init_cli_logging();

  let cli = Cli::parse();
  let config = Config::load(cli.config.as_deref())?;

  match cli.command {
    Commands::Evaluate {
      document,
      age,
      gender,
      procedure,
      location,
      months,
      json,
    } => {
      let gender: Gender = gender.parse().map_err(|e: String| anyhow::anyhow!(e))?;
      let claim = Claim::new(age, gender, procedure, location, months)?;
      let session = ingest(&document, &config)?;
      run_evaluation(&session, &claim, &config, json).await?;
    }

    Commands::Query { document, text, json } => {
      let claim = engine::parse_claim(&text)?;
      if !json {
        println!(
          "Parsed claim: {} year old {}, {} in {}, {} month policy",
          claim.age, claim.gender, claim.procedure, claim.location, claim.policy_duration_months
        );
        println!();
      }
      let session = ingest(&document, &config)?;
      run_evaluation(&session, &claim, &config, json).await?;
    }

    Commands::Inspect { document, text, json } => {
      let claim = engine::parse_claim(&text)?;
      let session = ingest(&document, &config)?;
      let chunks = session.retrieve_for_claim(&claim)?;

      if json {
        let doc = session.document();
        println!(
          "{}",
          serde_json::to_string_pretty(&serde_json::json!({
            "document": doc,
            "claim": claim,
            "chunks": chunks,
          }))?
        );
      } else {
        let doc = session.document();
        println!("Document: {} ({} chunks, {} chars)", doc.title, doc.chunk_count, doc.char_count);
        println!("Query:    {} in {} ({} months)", claim.procedure, claim.location, claim.policy_duration_months);
        println!();
        for (i, chunk) in chunks.iter().enumerate() {
          println!("Clause {}:", i + 1);
          println!("{}", chunk.trim());
          println!();
        }
      }
    }
  }

  Ok(())
}
