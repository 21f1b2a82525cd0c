//! A small cell-flow page model.
//!
//! Content is placed as fixed-size cells from a cursor that moves right
//! after each cell or back to the left margin on a line break. The result
//! is a list of positioned cells in page units (millimetres on A4) that a
//! template can draw without knowing anything about the flow.

use strum_macros::Display;

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;

/// Horizontal inset of text from the cell edge
pub const CELL_PADDING: f64 = 1.0;

/// Millimetres per typographic point
const MM_PER_PT: f64 = 25.4 / 72.0;

#[derive(Display, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Align {
    #[strum(serialize = "start")]
    Left,
    #[strum(serialize = "middle")]
    Center,
    #[strum(serialize = "end")]
    Right,
}

#[derive(Display, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Weight {
    #[strum(serialize = "normal")]
    Regular,
    #[strum(serialize = "bold")]
    Bold,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Font {
    pub weight: Weight,
    pub size_pt: f64,
}

impl Font {
    pub const fn regular(size_pt: f64) -> Self {
        Self {
            weight: Weight::Regular,
            size_pt,
        }
    }

    pub const fn bold(size_pt: f64) -> Self {
        Self {
            weight: Weight::Bold,
            size_pt,
        }
    }

    pub fn size_mm(&self) -> f64 {
        self.size_pt * MM_PER_PT
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Border {
    None,
    Top,
    Bottom,
}

/// Where the cursor goes after a cell is placed
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Right,
    NextLine,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub align: Align,
    pub border: Border,
    pub font: Font,
}

/// A straight rule drawn along one edge of a cell
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Rule {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Cell {
    /// Anchor x for the text given its alignment
    pub fn text_x(&self) -> f64 {
        match self.align {
            Align::Left => self.x + CELL_PADDING,
            Align::Center => self.x + self.width / 2.0,
            Align::Right => self.x + self.width - CELL_PADDING,
        }
    }

    /// Baseline y that vertically centres a line of text in the cell
    pub fn text_y(&self) -> f64 {
        self.y + self.height / 2.0 + 0.3 * self.font.size_mm()
    }

    pub fn rule(&self) -> Option<Rule> {
        let y = match self.border {
            Border::None => return None,
            Border::Top => self.y,
            Border::Bottom => self.y + self.height,
        };
        Some(Rule {
            x1: self.x,
            y1: y,
            x2: self.x + self.width,
            y2: y,
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Page {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub cells: Vec<Cell>,
    x: f64,
    y: f64,
    font: Font,
}

impl Page {
    pub fn a4(margin: f64) -> Self {
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            margin,
            cells: Vec::new(),
            x: margin,
            y: margin,
            font: Font::regular(12.0),
        }
    }

    pub fn printable_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    #[cfg(test)]
    pub fn cursor(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Place a cell at the cursor. A width of zero extends the cell to
    /// the right margin.
    pub fn cell(
        &mut self,
        width: f64,
        height: f64,
        text: &str,
        border: Border,
        align: Align,
        flow: Flow,
    ) {
        let width = if width == 0.0 {
            self.width - self.margin - self.x
        } else {
            width
        };

        self.cells.push(Cell {
            x: self.x,
            y: self.y,
            width,
            height,
            text: text.to_string(),
            align,
            border,
            font: self.font,
        });

        match flow {
            Flow::Right => self.x += width,
            Flow::NextLine => self.ln(height),
        }
    }

    /// Move to the left margin, `height` further down
    pub fn ln(&mut self, height: f64) {
        self.x = self.margin;
        self.y += height;
    }

    pub fn rules(&self) -> Vec<Rule> {
        self.cells.iter().filter_map(Cell::rule).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_flow_right_then_break() {
        let mut page = Page::a4(20.0);
        page.cell(50.0, 10.0, "a", Border::None, Align::Left, Flow::Right);
        assert_eq!(page.cursor(), (70.0, 20.0));
        page.cell(30.0, 10.0, "b", Border::None, Align::Left, Flow::NextLine);
        assert_eq!(page.cursor(), (20.0, 30.0));
        assert_eq!(page.cells[1].x, 70.0);
    }

    #[test]
    fn zero_width_extends_to_right_margin() {
        let mut page = Page::a4(20.0);
        page.set_x(60.0);
        page.cell(0.0, 10.0, "rest", Border::None, Align::Center, Flow::NextLine);
        assert_eq!(page.cells[0].width, 130.0);
        assert_eq!(page.cells[0].text_x(), 125.0);
    }

    #[test]
    fn text_anchor_follows_alignment() {
        let mut page = Page::a4(20.0);
        page.cell(40.0, 10.0, "l", Border::None, Align::Left, Flow::Right);
        page.cell(40.0, 10.0, "c", Border::None, Align::Center, Flow::Right);
        page.cell(40.0, 10.0, "r", Border::None, Align::Right, Flow::Right);

        let xs: Vec<f64> = page.cells.iter().map(Cell::text_x).collect();
        assert_eq!(xs, vec![21.0, 80.0, 139.0]);
        assert_eq!(Align::Center.to_string(), "middle");
        assert_eq!(Align::Right.to_string(), "end");
    }

    #[test]
    fn borders_become_rules() {
        let mut page = Page::a4(20.0);
        page.cell(85.0, 10.0, "h", Border::Bottom, Align::Center, Flow::NextLine);
        page.cell(85.0, 10.0, "t", Border::Top, Align::Left, Flow::Right);
        page.cell(85.0, 10.0, "n", Border::None, Align::Left, Flow::Right);

        let rules = page.rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], Rule { x1: 20.0, y1: 30.0, x2: 105.0, y2: 30.0 });
        assert_eq!(rules[1], Rule { x1: 20.0, y1: 30.0, x2: 105.0, y2: 30.0 });
    }

    #[test]
    fn cells_carry_the_current_font() {
        let mut page = Page::a4(20.0);
        page.set_font(Font::bold(16.0));
        page.cell(10.0, 10.0, "x", Border::None, Align::Left, Flow::Right);
        page.set_font(Font::regular(10.0));
        page.cell(10.0, 10.0, "y", Border::None, Align::Left, Flow::Right);

        assert_eq!(page.cells[0].font.weight, Weight::Bold);
        assert_eq!(page.cells[1].font, Font::regular(10.0));
    }
}
