use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::debug;
use thiserror::Error;

use crate::cli::Opts;
use crate::config::ConfigFile;
use crate::email;
use crate::error::{ConfigError, EmailError, RenderError};
use crate::invoice::{self, RenderResult};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("{source}")]
    Render {
        #[from]
        source: RenderError,
    },

    #[error("{source}")]
    Email {
        #[from]
        source: EmailError,
    },
}

#[derive(Debug)]
pub struct Outcome {
    pub rendered: RenderResult,
    pub email_path: Option<PathBuf>,
}

pub fn run(opts: Opts) -> Result<(), RunError> {
    let config_path = opts.config.clone();
    let outcome = run_on(opts, Local::now().date_naive())?;
    report(&outcome, &config_path);
    Ok(())
}

fn report(outcome: &Outcome, config_path: &Path) {
    let rendered = &outcome.rendered;
    println!("\nInvoice generation complete!");
    println!(
        "Invoice #{}: {}",
        rendered.number,
        rendered.document_path.display()
    );
    println!("Total: {}", rendered.total);
    if let Some(path) = &outcome.email_path {
        println!("Email draft: {}", path.display());
    }
    if let Some(next) = &rendered.next_number {
        println!("Next invoice number: {}", next);
    }
    println!(
        "\nEdit {} to customize sender, receiver, and services.",
        config_path.display()
    );
}

/// Run with `today` standing in for the current date
fn run_on(opts: Opts, today: NaiveDate) -> Result<Outcome, RunError> {
    let invoice_date = opts.date.unwrap_or(today);
    debug!("Invoicing for {} with {}", invoice_date, opts.config.display());

    let (mut file, created) = ConfigFile::open_or_create(&opts.config)?;
    if created {
        println!(
            "Created default configuration at {}. \
             Please edit it with your information.",
            opts.config.display()
        );
    }
    file.config.validate()?;

    let rendered = invoice::render(&mut file, invoice_date)?;
    println!("Invoice saved to: {}", rendered.document_path.display());

    let email_path = match file.config.email {
        Some(_) => {
            let path = email::draft(
                &file.config,
                &rendered.document_path,
                rendered.invoice_date,
            )?;
            println!("Email draft saved to: {}", path.display());
            Some(path)
        }
        None => None,
    };

    Ok(Outcome {
        rendered,
        email_path,
    })
}
