use crate::api::Report;
use chrono::{DateTime, Utc};

pub const REPORT_WEB_URL: &str = "https://hackerone.com/reports";

/// Formats a UTC timestamp as local time for terminal output.
///
/// # Arguments
/// * `ts` - The timestamp to render.
///
/// # Returns
/// A formatted string "MM/DD/YYYY HH:MMam/pm".
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&chrono::Local)
        .format("%m/%d/%Y %I:%M%P")
        .to_string()
}

/// Formats an optional timestamp, falling back to "N/A".
pub fn format_optional_timestamp(ts: Option<&DateTime<Utc>>) -> String {
    ts.map(format_timestamp).unwrap_or_else(|| "N/A".to_string())
}

/// Browser URL of a report on the HackerOne website.
pub fn report_url(id: &str) -> String {
    format!("{}/{}", REPORT_WEB_URL, id)
}

/// One line summary used by the `reports` listing.
///
/// # Arguments
/// * `report` - The report to summarize.
///
/// # Returns
/// `#<id> [<severity>] <title> (<state>, <created>)`.
pub fn report_summary(report: &Report) -> String {
    format!(
        "#{} [{}] {} ({}, {})",
        report.id,
        report.severity,
        report.title,
        report.state,
        format_timestamp(&report.created_at)
    )
}

/// Multi-line detail block used by the `report` command.
pub fn report_detail(report: &Report) -> String {
    let score = report
        .score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let mut lines = vec![
        format!("Report:      #{}", report.id),
        format!("Title:       {}", report.title),
        format!("State:       {}", report.state),
        format!("Severity:    {} (score {})", report.severity, score),
        format!("Created:     {}", format_timestamp(&report.created_at)),
        format!("Triaged:     {}", format_optional_timestamp(report.triaged_at.as_ref())),
        format!("Closed:      {}", format_optional_timestamp(report.closed_at.as_ref())),
    ];

    if let Some(label) = report.classification_label() {
        lines.push(format!("Weakness:    {}", label));
    }
    if let Some(reporter) = &report.reporter {
        lines.push(format!("Reporter:    {}", reporter));
    }
    if let Some(reference) = &report.issue_tracker_reference_id {
        lines.push(format!("Reference:   {}", reference));
    }
    if !report.bounties.is_empty() {
        lines.push(format!("Paid:        ${:.2}", report.payment_total()));
    }
    lines.push(format!("URL:         {}", report_url(&report.id)));

    lines.join("\n")
}
