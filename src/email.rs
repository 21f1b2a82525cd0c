use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use strum_macros::{Display, EnumString};

use crate::calendar::InvoiceDates;
use crate::config::{write_atomically, Config, EmailTemplates};
use crate::error::{EmailError, TemplateError};
use crate::templates;

/// Names that may appear in braces in the subject and body templates
#[derive(Display, EnumString, Debug, PartialEq, Eq, Clone, Copy)]
#[strum(serialize_all = "snake_case")]
pub enum Placeholder {
    Month,
    Year,
    ClientName,
    SenderName,
}

#[derive(Debug, PartialEq, Clone)]
enum Segment<'a> {
    Text(&'a str),
    Field(Placeholder),
}

/// Split a template into literal text and placeholders. `{{` and `}}`
/// are literal braces.
fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            '{' | '}' if chars.peek().map(|(_, n)| *n) == Some(c) => {
                // keep the first brace of the pair, drop the second
                segments.push(Segment::Text(&template[start..=offset]));
                chars.next();
                start = offset + 2;
            }
            '{' => {
                segments.push(Segment::Text(&template[start..offset]));
                let close = template[offset..].find('}').ok_or(
                    TemplateError::UnbalancedBrace { brace: '{', offset },
                )? + offset;
                let name = &template[offset + 1..close];
                let field = Placeholder::from_str(name).map_err(|_| {
                    TemplateError::UnknownPlaceholder {
                        name: name.to_string(),
                    }
                })?;
                segments.push(Segment::Field(field));
                while chars.peek().is_some_and(|(i, _)| *i <= close) {
                    chars.next();
                }
                start = close + 1;
            }
            '}' => {
                return Err(TemplateError::UnbalancedBrace { brace: '}', offset })
            }
            _ => {}
        }
    }
    segments.push(Segment::Text(&template[start..]));
    segments.retain(|s| s != &Segment::Text(""));

    Ok(segments)
}

/// Placeholders referenced by `template`, in order of appearance
pub fn placeholders(template: &str) -> Result<Vec<Placeholder>, TemplateError> {
    Ok(parse(template)?
        .into_iter()
        .filter_map(|s| match s {
            Segment::Field(p) => Some(p),
            Segment::Text(_) => None,
        })
        .collect())
}

/// Every name the templates reference must be set in the configuration
pub fn check_fields(
    config: &Config,
    email: &EmailTemplates,
) -> Result<(), EmailError> {
    for (template, text) in email.templates() {
        for placeholder in placeholders(text)? {
            let (field, value) = match placeholder {
                Placeholder::ClientName => ("receiver.name", &config.receiver.name),
                Placeholder::SenderName => ("sender.name", &config.sender.name),
                Placeholder::Month | Placeholder::Year => continue,
            };
            if value.is_none() {
                return Err(EmailError::MissingTemplateField { field, template });
            }
        }
    }
    Ok(())
}

/// Values substituted into the templates for one invoice
#[derive(Debug, PartialEq, Clone)]
pub struct TemplateValues<'a> {
    pub month: &'a str,
    pub year: String,
    pub client_name: Option<&'a str>,
    pub sender_name: Option<&'a str>,
}

impl<'a> TemplateValues<'a> {
    pub fn new(config: &'a Config, invoice_date: NaiveDate) -> Self {
        Self {
            month: invoice_date.month_name(),
            year: invoice_date.year().to_string(),
            client_name: config.receiver.name.as_deref(),
            sender_name: config.sender.name.as_deref(),
        }
    }

    fn get(&self, placeholder: Placeholder) -> Option<&str> {
        match placeholder {
            Placeholder::Month => Some(self.month),
            Placeholder::Year => Some(self.year.as_str()),
            Placeholder::ClientName => self.client_name,
            Placeholder::SenderName => self.sender_name,
        }
    }
}

pub fn fill(
    template: &str,
    values: &TemplateValues<'_>,
) -> Result<String, TemplateError> {
    let mut filled = String::with_capacity(template.len());
    for segment in parse(template)? {
        match segment {
            Segment::Text(text) => filled.push_str(text),
            Segment::Field(p) => filled.push_str(values.get(p).ok_or_else(
                || TemplateError::MissingField {
                    name: p.to_string(),
                },
            )?),
        }
    }
    Ok(filled)
}

/// Write an email draft for the invoice at `document_path` and return
/// where it was saved.
pub fn draft(
    config: &Config,
    document_path: &Path,
    invoice_date: NaiveDate,
) -> Result<PathBuf, EmailError> {
    let email = config.email.as_ref().ok_or(EmailError::NoEmailSettings)?;
    check_fields(config, email)?;

    let email_dir = &config.output.email_dir;
    fs::create_dir_all(email_dir).map_err(|source| EmailError::Io {
        path: email_dir.clone(),
        source,
    })?;

    let values = TemplateValues::new(config, invoice_date);
    let subject = fill(&email.subject_template, &values)?;
    let body = fill(&email.body_template, &values)?;
    let attachment = document_path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    debug!("Email subject: {}", subject);

    let draft = templates::email_draft(email, &subject, &body, &attachment)?;
    let email_path = email_dir.join(format!(
        "Email_{}_{}.txt",
        values.month, values.year
    ));
    write_atomically(&email_path, draft.as_bytes()).map_err(|source| {
        EmailError::Io {
            path: email_path.clone(),
            source,
        }
    })?;
    info!("Wrote email draft {}", email_path.display());

    Ok(email_path)
}
