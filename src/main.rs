/*
 * Monthly invoice generator
 *
 * Reads sender, receiver, services and the running invoice number from a
 * JSON configuration file (created with placeholder values on first use),
 * then:
 *  - lays out a one page A4 invoice and saves it as SVG, one per month
 *  - advances a numeric invoice number and saves it back to the same file
 *  - drafts an email for the invoice from the configured templates
 *
 * Set RUST_LOG=info or RUST_LOG=debug to see what is written where.
 */

mod billing;
mod calendar;
mod cli;
mod config;
mod email;
mod error;
mod invoice;
mod layout;
mod run;
mod templates;

use std::process;

use clap::Parser;
use crate::cli::Opts;

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let opts = Opts::parse();

    if let Err(error) = run::run(opts) {
        eprintln!("error, {}", error);
        process::exit(1);
    }
}
