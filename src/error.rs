use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO Error on '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Malformed configuration in '{}': {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Error encoding configuration: {source}")]
    Encode {
        #[from]
        source: serde_json::Error,
    },

    #[error("Service '{description}' has a negative quantity or unit price")]
    NegativeAmount { description: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("Unknown placeholder '{{{name}}}' in template")]
    UnknownPlaceholder { name: String },

    #[error("Unbalanced '{brace}' at offset {offset} in template")]
    UnbalancedBrace { brace: char, offset: usize },

    #[error("No value for placeholder '{{{name}}}'")]
    MissingField { name: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Could not find invoice number in config file")]
    MissingInvoiceNumber,

    #[error("Invoice total does not fit in a decimal amount")]
    AmountOverflow,

    #[error("IO Error on '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Error rendering invoice: {source}")]
    Template {
        #[from]
        source: askama::Error,
    },

    #[error("{source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("No email section in the configuration file")]
    NoEmailSettings,

    #[error(
        "{field} is required by the {template} template, \
        add it to the configuration file"
    )]
    MissingTemplateField {
        field: &'static str,
        template: &'static str,
    },

    #[error("{source}")]
    Template {
        #[from]
        source: TemplateError,
    },

    #[error("IO Error on '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("Error rendering email draft: {source}")]
    Render {
        #[from]
        source: askama::Error,
    },
}
