//! Plain-text rendering of the worklog report.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::DailyWorklogs;

const HEADER: &str = "Date       | Hours | Task ID    | Summary";
const RULE: &str = "-----------|-------|------------|--------";

/// Report title for the month containing `date`, e.g. `Tracked worklogs (working days only), August 2025`.
pub fn report_title(date: NaiveDate) -> String {
    format!("Tracked worklogs (working days only), {}", date.format("%B %Y"))
}

/// Renders the report table.
///
/// Each day lists one row per worklog followed by a total line. Days
/// without worklogs are omitted.
pub fn render_report(title: &str, days: &DailyWorklogs) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    for (date, lines) in days.iter().filter(|(_, lines)| !lines.is_empty()) {
        let mut total = Decimal::ZERO;
        for line in lines {
            total += line.hours;
            out.push_str(&format!(
                "{} | {:>5} | {:<10} | {}\n",
                date.format("%Y-%m-%d"),
                hours(line.hours),
                line.issue,
                line.summary
            ));
        }
        out.push_str(&format!("{}Total  | {:>5} h\n\n", " ".repeat(11), hours(total)));
    }

    out
}

fn hours(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}
