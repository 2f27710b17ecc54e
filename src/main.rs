//! GIDEON CLI - query the GIDEON infectious disease API from the terminal
//!
//! Responses are cached locally so that repeated questions do not hit the
//! remote service again within the freshness window.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gideon::cli::{CacheCommand, Cli, Command};
use gideon::codes::{endpoint_for, lookup_item, LookupResult};
use gideon::diseases;
use gideon::query::{Gideon, Params, QueryOptions};
use gideon::table::Tabular;

type BoxError = Box<dyn std::error::Error>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for query output
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    // Pure lookups that never need a client
    if let Command::Endpoint { category } = &cli.command {
        println!("{}", endpoint_for(category)?);
        return Ok(());
    }

    let client = Gideon::new(cli.client_config())?;
    let result = execute(&client, cli.command).await;
    client.shutdown();
    result
}

async fn execute(client: &Gideon, command: Command) -> Result<(), BoxError> {
    match command {
        Command::Query {
            path,
            params,
            force_online,
            max_age_hours,
            json,
        } => {
            let params: Params = params.params.into_iter().collect();
            let options = QueryOptions::default()
                .force_online(force_online)
                .max_age_hours(Some(max_age_hours));
            let response = client.query(&path, &params, options).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", Tabular::from(response));
            }
        }
        Command::Raw { path, params } => {
            let params: Params = params.params.into_iter().collect();
            let raw = client.query_online_raw(&path, &params).await?;
            println!("HTTP {}", raw.status);
            println!("{}", raw.body);
        }
        Command::Endpoint { category } => println!("{}", endpoint_for(&category)?),
        Command::Lookup { category, name } => match lookup_item(client, &category, &name).await? {
            LookupResult::Unique(code) => println!("{}", code),
            LookupResult::NotFound => return Err(format!("no {} named '{}'", category, name).into()),
            LookupResult::Ambiguous(candidates) => {
                println!("Multiple matches for '{}':", name);
                for candidate in candidates {
                    println!("{}\t{}", candidate.code, candidate.name);
                }
            }
        },
        Command::Outbreaks { year, country } => {
            let table = match country {
                Some(country) => diseases::outbreaks_by_country_year(client, &country, year).await?,
                None => diseases::outbreaks_by_year(client, year).await?,
            };
            print!("{}", table);
        }
        Command::LatestOutbreaks { country } => {
            print!("{}", diseases::latest_outbreaks_by_country(client, &country).await?);
        }
        Command::DiseaseOutbreaks { disease } => {
            print!("{}", diseases::outbreaks_by_disease(client, disease).await?);
        }
        Command::EndemicCountries { disease } => {
            print!("{}", diseases::endemic_countries_by_disease(client, disease).await?);
        }
        Command::EndemicDiseases { country } => {
            print!("{}", diseases::endemic_diseases_by_country(client, &country).await?);
        }
        Command::FilterDiseases(args) => {
            print!("{}", diseases::filter_diseases(client, &args.into()).await?);
        }
        Command::Cache { action } => match action {
            CacheCommand::Sweep { hours } => {
                let removed = client.sweep_cache(hours);
                println!("Removed {} cached responses", removed);
            }
            CacheCommand::Clear => {
                client.clear_cache();
                println!("Cache cleared");
            }
            CacheCommand::Path => match client.cache_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("Cache is kept in memory only"),
            },
        },
    }
    Ok(())
}
