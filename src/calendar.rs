use chrono::{Datelike, Month, NaiveDate};

/// Date renderings used on the invoice and in output file names.
pub trait InvoiceDates {
    /// Full English month name, e.g. "March"
    fn month_name(&self) -> &'static str;

    /// Long form used in the invoice header, e.g. "March 5, 2024"
    fn long_form(&self) -> String;

    /// Month and year joined for file names, e.g. "March_2024"
    fn month_year(&self) -> String;
}

impl InvoiceDates for NaiveDate {
    fn month_name(&self) -> &'static str {
        // month() is always 1..=12
        Month::try_from(self.month() as u8)
            .map(|m| m.name())
            .unwrap_or_default()
    }

    fn long_form(&self) -> String {
        format!("{} {}, {}", self.month_name(), self.day(), self.year())
    }

    fn month_year(&self) -> String {
        format!("{}_{}", self.month_name(), self.year())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn month_name() {
        assert_eq!(ymd(2024, 1, 31).month_name(), "January");
        assert_eq!(ymd(2024, 3, 15).month_name(), "March");
        assert_eq!(ymd(2023, 9, 1).month_name(), "September");
        assert_eq!(ymd(2023, 12, 24).month_name(), "December");
    }

    #[test]
    fn long_form() {
        assert_eq!(ymd(2024, 3, 15).long_form(), "March 15, 2024");
        assert_eq!(ymd(2024, 3, 5).long_form(), "March 5, 2024");
        assert_eq!(ymd(2025, 2, 28).long_form(), "February 28, 2025");
    }

    #[test]
    fn month_year() {
        assert_eq!(ymd(2024, 3, 15).month_year(), "March_2024");
        assert_eq!(ymd(2024, 3, 1).month_year(), ymd(2024, 3, 31).month_year());
        assert_ne!(ymd(2024, 3, 1).month_year(), ymd(2025, 3, 1).month_year());
    }
}
