use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

static SHORT_DATE: &[FormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

/// Renders a date as `M/D/YYYY`, the form used in plan titles and list
/// exports.
pub fn short_date(date: Date) -> String {
    date.format(SHORT_DATE).unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn short_date_drops_leading_zeros() {
        assert_eq!(short_date(date!(2026 - 02 - 03)), "2/3/2026");
    }

    #[test]
    fn short_date_keeps_double_digits() {
        assert_eq!(short_date(date!(2026 - 11 - 28)), "11/28/2026");
    }
}
