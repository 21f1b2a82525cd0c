use chrono::NaiveDate;
use clap::{Parser, ValueHint};
use std::path::PathBuf;

/// Generate this month's invoice and an email draft to send it with
#[derive(Parser, Debug)]
#[clap(name = "billdraft", version)]
pub struct Opts {
    /// Invoice date (YYYY-MM-DD), defaults to today
    #[clap(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Path to the configuration file, created with defaults if missing
    #[clap(long, default_value = "config.json",
        value_hint = ValueHint::FilePath)]
    pub config: PathBuf,
}
