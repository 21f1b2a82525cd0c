use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::billing::{next_invoice_number, InvoiceTotal, Money};
use crate::calendar::InvoiceDates;
use crate::config::{write_atomically, Config, ConfigFile};
use crate::error::RenderError;
use crate::layout::{Align, Border, Flow, Font, Page};
use crate::templates;

pub const MARGIN: f64 = 20.0;

/// Header cells: label, number, date
const HEADER_WIDTHS: [f64; 3] = [50.0, 70.0, 50.0];
const PARTY_WIDTH: f64 = 85.0;

/// Share of the printable width for description, quantity, unit price
/// and amount
const COLUMN_SHARES: [f64; 4] = [0.50, 0.15, 0.15, 0.20];

const ROW_HEIGHT: f64 = 10.0;
const PARTY_LINE_HEIGHT: f64 = 5.0;
const GAP: f64 = 10.0;

#[derive(Debug, PartialEq, Clone)]
pub struct RenderResult {
    pub document_path: PathBuf,
    pub invoice_date: NaiveDate,
    pub total: Money,
    /// Number printed on this invoice
    pub number: String,
    /// Number saved for the next run, when the current one is numeric
    pub next_number: Option<String>,
}

/// Render the invoice for `invoice_date`, write it to the invoice
/// directory, then advance and save the invoice number.
pub fn render(
    file: &mut ConfigFile,
    invoice_date: NaiveDate,
) -> Result<RenderResult, RenderError> {
    let config = &file.config;
    let number = config
        .invoice
        .number
        .clone()
        .ok_or(RenderError::MissingInvoiceNumber)?;

    let invoice_dir = &config.output.invoice_dir;
    fs::create_dir_all(invoice_dir).map_err(|source| RenderError::Io {
        path: invoice_dir.clone(),
        source,
    })?;

    let totals = InvoiceTotal::calculate(&config.services)
        .ok_or(RenderError::AmountOverflow)?;
    for service in config.services.iter() {
        debug!("{}", service);
    }
    debug!("Invoice #{} {}", number, totals);

    let page = lay_out(config, &number, invoice_date, &totals);
    let svg = templates::invoice_svg(&page)?;

    let document_path = invoice_dir.join(document_name(invoice_date));
    write_atomically(&document_path, svg.as_bytes()).map_err(|source| {
        RenderError::Io {
            path: document_path.clone(),
            source,
        }
    })?;
    info!("Wrote invoice #{} to {}", number, document_path.display());

    let next_number = next_invoice_number(&number);
    match &next_number {
        Some(next) => {
            file.config.invoice.number = Some(next.clone());
            file.save()?;
            info!(
                "Next invoice number {} saved to {}",
                next,
                file.path().display()
            );
        }
        None => warn!(
            "Invoice number '{}' is not numeric, it will not be advanced",
            number
        ),
    }

    Ok(RenderResult {
        document_path,
        invoice_date,
        total: totals.total,
        number,
        next_number,
    })
}

/// One document per month: later runs in the same month replace it
pub fn document_name(invoice_date: NaiveDate) -> String {
    format!("Invoice_{}.svg", invoice_date.month_year())
}

/// Place every element of the invoice on an A4 page
pub fn lay_out(
    config: &Config,
    number: &str,
    invoice_date: NaiveDate,
    totals: &InvoiceTotal,
) -> Page {
    let mut page = Page::a4(MARGIN);

    page.set_font(Font::bold(16.0));
    let [label_w, number_w, date_w] = HEADER_WIDTHS;
    page.cell(label_w, ROW_HEIGHT, "INVOICE", Border::None, Align::Left, Flow::Right);
    page.cell(
        number_w,
        ROW_HEIGHT,
        &format!("#{}", number),
        Border::None,
        Align::Center,
        Flow::Right,
    );
    page.cell(
        date_w,
        ROW_HEIGHT,
        &invoice_date.long_form(),
        Border::None,
        Align::Right,
        Flow::NextLine,
    );
    page.ln(GAP);

    lay_out_parties(&mut page, config);
    page.ln(GAP);

    lay_out_table(&mut page, config, totals);

    page.ln(GAP);
    page.set_font(Font::bold(10.0));
    page.cell(
        0.0,
        ROW_HEIGHT,
        "Thank you for your business!",
        Border::None,
        Align::Center,
        Flow::NextLine,
    );

    page
}

fn lay_out_parties(page: &mut Page, config: &Config) {
    page.set_font(Font::bold(12.0));
    page.cell(PARTY_WIDTH, ROW_HEIGHT, "FROM:", Border::None, Align::Left, Flow::Right);
    page.cell(PARTY_WIDTH, ROW_HEIGHT, "BILL TO:", Border::None, Align::Left, Flow::NextLine);

    let (sender, receiver) = (&config.sender, &config.receiver);
    page.set_font(Font::regular(10.0));
    for (from, to) in [
        (&sender.company, &receiver.company),
        (&sender.address, &receiver.address),
        (&sender.city, &receiver.city),
    ] {
        page.cell(PARTY_WIDTH, PARTY_LINE_HEIGHT, from, Border::None, Align::Left, Flow::Right);
        page.cell(PARTY_WIDTH, PARTY_LINE_HEIGHT, to, Border::None, Align::Left, Flow::NextLine);
    }

    // receiver contact details are never printed
    let phone = sender.phone.as_deref().unwrap_or_default();
    let email = sender.email.as_deref().unwrap_or_default();
    for line in [format!("Phone: {}", phone), format!("Email: {}", email)] {
        page.cell(0.0, PARTY_LINE_HEIGHT, &line, Border::None, Align::Left, Flow::NextLine);
    }
}

fn lay_out_table(page: &mut Page, config: &Config, totals: &InvoiceTotal) {
    let table_width = page.printable_width();
    let [desc_w, qty_w, price_w, amount_w] =
        COLUMN_SHARES.map(|share| table_width * share);

    page.set_x(page.margin);
    page.set_font(Font::bold(10.0));
    for (width, label, flow) in [
        (desc_w, "DESCRIPTION", Flow::Right),
        (qty_w, "QUANTITY", Flow::Right),
        (price_w, "UNIT PRICE", Flow::Right),
        (amount_w, "AMOUNT", Flow::NextLine),
    ] {
        page.cell(width, ROW_HEIGHT, label, Border::Bottom, Align::Center, flow);
    }

    page.set_font(Font::regular(10.0));
    for (service, amount) in config.services.iter().zip(totals.lines.iter()) {
        page.set_x(page.margin);
        page.cell(desc_w, ROW_HEIGHT, &service.description, Border::None, Align::Left, Flow::Right);
        page.cell(
            qty_w,
            ROW_HEIGHT,
            &service.quantity_display(),
            Border::None,
            Align::Center,
            Flow::Right,
        );
        page.cell(
            price_w,
            ROW_HEIGHT,
            &service.unit_price.to_string(),
            Border::None,
            Align::Right,
            Flow::Right,
        );
        page.cell(
            amount_w,
            ROW_HEIGHT,
            &amount.to_string(),
            Border::None,
            Align::Right,
            Flow::NextLine,
        );
    }

    page.set_x(page.margin);
    page.set_font(Font::bold(10.0));
    page.cell(
        desc_w + qty_w + price_w,
        ROW_HEIGHT,
        "TOTAL",
        Border::Top,
        Align::Left,
        Flow::Right,
    );
    page.cell(
        amount_w,
        ROW_HEIGHT,
        &totals.total.to_string(),
        Border::Top,
        Align::Right,
        Flow::NextLine,
    );
}
