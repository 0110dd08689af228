use agri_qa::answer::{generate, Answer};
use agri_qa::config::AppConfig;
use agri_qa::dataset::Tables;
use agri_qa::interpreter::interpret;
use agri_qa::shell::{self, Status, EXAMPLE_QUESTIONS};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agri-qa")]
#[command(about = "Answer questions about Indian crop production and rainfall")]
#[command(version)]
struct Args {
    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs)]
struct DataArgs {
    /// Directory holding the CSV files (or set AGRI_QA_DATA_DIR)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Crop production CSV (or set AGRI_QA_CROP_CSV)
    #[arg(long, global = true)]
    crop: Option<String>,

    /// IMD rainfall CSV (or set AGRI_QA_RAIN_CSV)
    #[arg(long, global = true)]
    rain: Option<String>,

    /// Merged rainfall + production CSV (or set AGRI_QA_MERGED_CSV)
    #[arg(long, global = true)]
    merged: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        /// The question in plain English
        query: String,

        /// Print intent, answer and chart as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a question is interpreted, without loading any data
    Interpret {
        /// The question in plain English
        query: String,
    },
    /// Answer questions read line by line from stdin
    Repl,
    /// List example questions
    Examples,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(AppConfig::from_env(), args.data);

    match args.command {
        Commands::Ask { query, json } => run_ask(&config, &query, json),
        Commands::Interpret { query } => {
            println!("{}", serde_json::to_string_pretty(&interpret(&query))?);
            Ok(())
        }
        Commands::Repl => run_repl(&config),
        Commands::Examples => {
            println!("{}", shell::TITLE);
            println!("{}\n", shell::CAPTION);
            for q in EXAMPLE_QUESTIONS {
                println!("- {}", q);
            }
            Ok(())
        }
    }
}

fn build_config(mut config: AppConfig, data: DataArgs) -> AppConfig {
    if let Some(dir) = data.data_dir {
        config.data_dir = dir;
    }
    if let Some(crop) = data.crop {
        config.crop_file = crop;
    }
    if let Some(rain) = data.rain {
        config.rain_file = rain;
    }
    if let Some(merged) = data.merged {
        config.merged_file = merged;
    }
    config
}

fn load_tables(config: &AppConfig) -> Result<Tables> {
    let paths = config.data_paths();
    Tables::load(&paths).with_context(|| {
        format!(
            "Failed to load datasets from {}",
            config.data_dir.display()
        )
    })
}

fn run_ask(config: &AppConfig, query: &str, json: bool) -> Result<()> {
    if query.trim().is_empty() {
        println!("{}", shell::EMPTY_QUERY_WARNING);
        return Ok(());
    }

    let tables = load_tables(config)?;
    let intent = interpret(query);
    let answer = generate(&intent, &tables);

    if json {
        let out = serde_json::json!({
            "intent": intent,
            "answer": answer.text,
            "chart": answer.chart,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_answer(&answer);
    }
    Ok(())
}

fn run_repl(config: &AppConfig) -> Result<()> {
    let tables = load_tables(config)?;
    info!("Ready for questions (Ctrl-D to quit)");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let reply = shell::ask(&line, &tables);
        match reply.status {
            Status::Warning => println!("Warning: {}", reply.answer.text),
            Status::Success => print_answer(&reply.answer),
        }
    }
    Ok(())
}

fn print_answer(answer: &Answer) {
    println!("{}", answer.text);

    if let Some(chart) = answer.chart.as_ref().filter(|c| !c.is_empty()) {
        println!("\n{:>6}  {:>16}  {:>16}", "Year", "Annual_Rainfall", "Production");
        for point in &chart.points {
            println!(
                "{:>6}  {:>16}  {:>16}",
                point.year,
                point.annual_rainfall.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string()),
                point.production.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string()),
            );
        }
    }
}
