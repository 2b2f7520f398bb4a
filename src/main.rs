//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `rawfetch` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Printing results as pretty JSON
//!
//! Exit codes: 0 on success, 1 when the fetch or search fails, 2 on usage errors.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::process;

use rawfetch::initialization::{init_crypto_provider, init_logger_with};
use rawfetch::{search, Client, Config, FetchError, Opt, RequestTarget};

const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() -> Result<()> {
    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprintln!("{e}");
            print_help()?;
            process::exit(EXIT_USAGE);
        }
    };

    let config = Config::from(&opt);
    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;
    init_crypto_provider();

    let client = Client::from_config(&config);

    let outcome = match (&opt.url, &opt.search) {
        (Some(url), _) => fetch_and_print(&client, url),
        (None, Some(words)) => search_and_print(&client, &words.join(" ")),
        (None, None) => {
            print_help()?;
            process::exit(EXIT_USAGE);
        }
    };

    if let Err(e) = outcome {
        eprintln!("rawfetch error [{}]: {}", e.kind(), e);
        process::exit(EXIT_FAILURE);
    }
    Ok(())
}

fn fetch_and_print(client: &Client<rawfetch::TlsTransport>, url: &str) -> Result<(), FetchError> {
    let target = RequestTarget::from_url(url)?;
    let result = client.fetch_page(&target)?;
    print_json(&result.to_display_value());
    Ok(())
}

fn search_and_print(client: &Client<rawfetch::TlsTransport>, term: &str) -> Result<(), FetchError> {
    let results = search(client, term)?;
    print_json(&serde_json::Value::from(results));
    Ok(())
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{pretty}"),
        Err(_) => println!("{value}"),
    }
}

fn print_help() -> Result<()> {
    Opt::command()
        .print_help()
        .context("Failed to print help")?;
    println!();
    Ok(())
}
