use crate::config::EmailTemplates;
use crate::layout::{Align, Cell, Page, Rule, Weight};

use askama::Template;

/// Page coordinates are written with two decimals
fn mm(value: f64) -> String {
    format!("{:.2}", value)
}

struct Text<'a> {
    x: String,
    y: String,
    anchor: Align,
    weight: Weight,
    size: String,
    content: &'a str,
}

impl<'a> From<&'a Cell> for Text<'a> {
    fn from(cell: &'a Cell) -> Self {
        Self {
            x: mm(cell.text_x()),
            y: mm(cell.text_y()),
            anchor: cell.align,
            weight: cell.font.weight,
            size: mm(cell.font.size_mm()),
            content: cell.text.as_str(),
        }
    }
}

struct Line {
    x1: String,
    y1: String,
    x2: String,
    y2: String,
}

impl From<Rule> for Line {
    fn from(rule: Rule) -> Self {
        Self {
            x1: mm(rule.x1),
            y1: mm(rule.y1),
            x2: mm(rule.x2),
            y2: mm(rule.y2),
        }
    }
}

#[derive(Template)]
#[template(path = "invoice.svg", escape = "html")]
struct InvoiceSvg<'a> {
    width: String,
    height: String,
    texts: Vec<Text<'a>>,
    lines: Vec<Line>,
}

pub fn invoice_svg(page: &Page) -> Result<String, askama::Error> {
    let data = InvoiceSvg {
        width: mm(page.width),
        height: mm(page.height),
        texts: page
            .cells
            .iter()
            .filter(|c| !c.text.is_empty())
            .map(Text::from)
            .collect(),
        lines: page.rules().into_iter().map(Line::from).collect(),
    };

    data.render()
}

#[derive(Template)]
#[template(path = "email.txt", escape = "none")]
struct EmailDraft<'a> {
    recipient: &'a str,
    sender: &'a str,
    subject: &'a str,
    body: &'a str,
    attachment: &'a str,
}

pub fn email_draft(
    email: &EmailTemplates,
    subject: &str,
    body: &str,
    attachment: &str,
) -> Result<String, askama::Error> {
    EmailDraft {
        recipient: email.recipient.as_str(),
        sender: email.sender.as_str(),
        subject,
        body,
        attachment,
    }
    .render()
}
