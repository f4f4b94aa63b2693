use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tabular_etl::config::AppConfig;
use tabular_etl::fetch::{Source, SourceReader};
use tabular_etl::jobs;
use tabular_etl::logging;
use tabular_etl::pipeline::{self, PipelineReport};
use tabular_etl::query::{render_table, run_queries, QueryOutcome};
use tabular_etl::sink::relational::SqliteSink;
use tabular_etl::sink::WriteMode;

#[derive(Parser)]
#[command(name = "tabular-etl")]
#[command(about = "Extract-validate-transform-load pipeline for small tabular datasets")]
#[command(version = "0.1.0")]
struct Cli {
    /// Directory for CSV and database outputs
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the largest-banks table and convert market caps per currency
    Banks {
        /// Override the page source (URL or local file path)
        #[arg(long)]
        source: Option<String>,
        /// Override the exchange-rate CSV source
        #[arg(long)]
        rates: Option<String>,
    },
    /// Scrape the 50 most highly ranked films
    TopFilms {
        #[arg(long)]
        source: Option<String>,
    },
    /// Scrape the top films released between 2000 and 2009
    Films2000s {
        #[arg(long)]
        source: Option<String>,
    },
    /// Load the instructor roster CSV and demonstrate append mode
    Instructors {
        /// Path to the instructor CSV file
        #[arg(long, default_value = "data/INSTRUCTOR.csv")]
        csv: PathBuf,
    },
}

fn parse_source(raw: &str) -> Source {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Source::Url(raw.to_string())
    } else {
        Source::File(PathBuf::from(raw))
    }
}

fn main() -> Result<()> {
    let app = AppConfig::load()?;
    logging::init_logging(&app.log_dir);

    let cli = Cli::parse();
    let reader = SourceReader::new(app.http_timeout(), &app.http.user_agent)?;
    let output_dir = cli.output_dir;
    let log_dir = app.log_dir;

    match cli.command {
        Commands::Banks { source, rates } => {
            let config = jobs::banks::config(
                &output_dir,
                &log_dir,
                source.as_deref().map(parse_source),
                rates.as_deref().map(parse_source),
            );
            let report = pipeline::run(&reader, &config)?;
            print_report(&config.name, &report);
        }
        Commands::TopFilms { source } => {
            let config =
                jobs::films::top_films_config(&output_dir, &log_dir, source.as_deref().map(parse_source));
            let report = pipeline::run(&reader, &config)?;
            print_report(&config.name, &report);
        }
        Commands::Films2000s { source } => {
            let config =
                jobs::films::films_2000s_config(&output_dir, &log_dir, source.as_deref().map(parse_source));
            let report = pipeline::run(&reader, &config)?;
            print_report(&config.name, &report);
        }
        Commands::Instructors { csv } => {
            let config = jobs::instructors::config(&output_dir, &log_dir, &csv);
            let report = pipeline::run(&reader, &config)?;
            print_report(&config.name, &report);

            // Append-mode demo: one extra instructor, then a fresh count.
            let extra = jobs::instructors::appended_row();
            let mut sink = SqliteSink::open(&config.db_path)?;
            sink.write(jobs::instructors::TABLE_NAME, &extra, WriteMode::Append)?;
            drop(sink);

            let count_query = vec![(
                "Row count after append".to_string(),
                format!(
                    "SELECT COUNT(*) AS n FROM {};",
                    jobs::instructors::TABLE_NAME
                ),
            )];
            let outcomes = run_queries(&config.db_path, &count_query)?;
            print_queries(&outcomes);
        }
    }

    Ok(())
}

fn print_report(name: &str, report: &PipelineReport) {
    println!("\n📊 Pipeline results for {name}:");
    println!("   Extracted rows: {}", report.extracted_rows);
    println!("   Dropped rows:   {}", report.dropped.len());
    println!("   Loaded rows:    {}", report.loaded_rows);
    if report.derived_columns > 0 {
        println!("   Derived columns: {}", report.derived_columns);
    }

    if !report.dropped.is_empty() {
        println!(
            "\n⚠️  Dropped {} of {} extracted rows:",
            report.dropped.len(),
            report.extracted_rows
        );
        for row in &report.dropped {
            println!("   row {}: {:?} ({})", row.grid_index, row.values, row.reason);
        }
    }

    print_queries(&report.queries);
}

fn print_queries(outcomes: &[QueryOutcome]) {
    for outcome in outcomes {
        println!("\n --- {} ---", outcome.title);
        match &outcome.result {
            Ok(table) => print!("{}", render_table(table)),
            Err(e) => println!("⚠️  {e}"),
        }
    }
}
