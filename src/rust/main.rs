use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use attendance_insights::{
    render, Dataset, IntentClassifier, QueryRouter, Response, RouterConfig,
};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file with Department, Peer Rating, Job Role and Attendance (%) columns
    #[arg(default_value = "Employee_Performance_Dataset.csv")]
    dataset: PathBuf,

    /// Answer a single question and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Treat predictions below this probability (0 to 1) as not understood
    #[arg(long, value_name = "P")]
    min_confidence: Option<f64>,

    /// Answer questions even when none of their words appear in the training examples
    #[arg(long)]
    allow_unknown_vocabulary: bool,

    /// Print answers as JSON
    #[arg(long)]
    json: bool,

    /// Also print the probability of every intent
    #[arg(long)]
    scores: bool,
}

fn main() -> Result<()> {
    attendance_insights::init_logger();
    let args = Args::parse();

    let start_time = Instant::now();
    info!("=== Starting Attendance Insights ===");

    let dataset = Dataset::from_path(&args.dataset)
        .with_context(|| format!("Failed to load dataset from {}", args.dataset.display()))?;

    let classifier = IntentClassifier::new().context("Failed to train intent classifier")?;
    let info = classifier.classifier().info();
    info!(
        "Intent classifier ready: {} intents, {} terms, {} iterations",
        info.num_classes, info.vocabulary_size, info.training_iterations
    );

    let config = RouterConfig::default()
        .with_min_confidence(args.min_confidence)
        .with_reject_unknown_vocabulary(!args.allow_unknown_vocabulary);
    let router = QueryRouter::new(classifier, config).context("Invalid router configuration")?;

    info!("=== Ready (took {:.2?}) ===", start_time.elapsed());

    if let Some(query) = &args.query {
        return process_input(&router, &dataset, query, &args);
    }

    if !args.json {
        println!("{}", render::banner());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("Your question here: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "quit" | "exit") {
            break;
        }
        process_input(&router, &dataset, query, &args)?;
    }

    info!("Session finished after {:.2?}", start_time.elapsed());
    Ok(())
}

fn process_input(router: &QueryRouter, dataset: &Dataset, query: &str, args: &Args) -> Result<()> {
    let classify_start = Instant::now();
    let routed = router.route(query, dataset);
    info!("Answered {:?} in {:.2?}", query, classify_start.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&routed)?);
        return Ok(());
    }

    if args.scores {
        if let Some(prediction) = &routed.prediction {
            let mut scores = prediction.scores.clone();
            scores.sort_by(|a, b| b.1.total_cmp(&a.1));

            println!("\nConfidence scores (sorted):");
            for (label, score) in scores {
                println!("  {}: {:.1}%", label, score * 100.0);
            }
        }
    }

    println!();
    print!("{}", routed.response);
    if let Response::NotUnderstood(reason) = &routed.response {
        println!("({})", reason);
    }
    println!();

    Ok(())
}
