use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aiie::evaluation::Engine;
use aiie::output::{format_duration, format_evaluation, format_hook_response, should_use_colors};
use aiie::scenario::normalize_duration;
use aiie::EvaluationError;

mod input;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_MISSING_FIELDS: i32 = 2;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a clinical scenario file (YAML, or JSON by .json extension)
    Evaluate {
        /// Path to the scenario file
        file: PathBuf,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Answer a CDS Hooks request file with advisory cards
    Hook {
        /// Path to the hook request file
        file: PathBuf,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a free-text duration is interpreted
    Duration {
        /// Duration text, e.g. "a couple of weeks"
        text: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "aiie")]
#[command(about = "Explainable imaging appropriateness scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "aiie=debug" } else { "aiie=warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            EXIT_INPUT
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let engine = Engine::new();
    let use_colors = should_use_colors();

    let code = match cli.command {
        Commands::Evaluate { file, json } => {
            let input = match input::load_scenario(&file) {
                Ok(input) => input,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            match engine.evaluate_input(&input) {
                Ok(result) if json => print_json(&result),
                Ok(result) => {
                    println!("{}", format_evaluation(&result, use_colors));
                    EXIT_SUCCESS
                }
                Err(EvaluationError::MissingFields(fields)) => {
                    eprintln!("Cannot score {}: missing required fields:", file.display());
                    for field in fields {
                        eprintln!("  - {}", field);
                    }
                    EXIT_MISSING_FIELDS
                }
            }
        }
        Commands::Hook { file, json } => {
            let request = match input::load_hook_request(&file) {
                Ok(request) => request,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let response = engine.handle_hook_request(&request);
            if json {
                print_json(&response)
            } else {
                println!("{}", format_hook_response(&response, use_colors));
                EXIT_SUCCESS
            }
        }
        Commands::Duration { text, json } => {
            let duration = normalize_duration(&text);
            if json {
                print_json(&duration)
            } else {
                println!("{}", format_duration(&duration));
                EXIT_SUCCESS
            }
        }
    };

    std::process::exit(code);
}
