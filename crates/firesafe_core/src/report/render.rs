//! Report rendering seam.
//!
//! # Responsibility
//! - Define the interface document renderers implement.
//! - Signal "nothing to render" as a distinct, non-error outcome.
//! - Provide a plain-text renderer as the default collaborator.

use crate::model::equipment::EquipmentKind;
use crate::report::aggregate::{EquipmentLine, ExpiringReport, ReportEntry};
use log::info;
use std::convert::Infallible;
use std::error::Error;

/// Title line of rendered documents.
pub const REPORT_TITLE: &str = "Expiring equipment report";
/// Placeholder rendered for a company without city.
pub const MISSING_CITY: &str = "N/A";

/// Turns an aggregated, non-empty report into a document.
pub trait ReportRenderer {
    type Output;
    type Error: Error + Send + Sync + 'static;

    fn render(&self, report: &ExpiringReport) -> Result<Self::Output, Self::Error>;
}

/// Result of a render request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome<T> {
    Rendered(T),
    /// The report had no entries; no document was produced.
    NothingToRender,
}

impl<T> RenderOutcome<T> {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    pub fn into_rendered(self) -> Option<T> {
        match self {
            Self::Rendered(output) => Some(output),
            Self::NothingToRender => None,
        }
    }
}

/// Renders `report`, or short-circuits when it is empty.
///
/// The renderer is never invoked for an empty report.
pub fn render_report<R: ReportRenderer>(
    report: &ExpiringReport,
    renderer: &R,
) -> Result<RenderOutcome<R::Output>, R::Error> {
    if report.is_empty() {
        info!("event=report_render module=report status=ok outcome=nothing_to_render");
        return Ok(RenderOutcome::NothingToRender);
    }

    let output = renderer.render(report)?;
    info!(
        "event=report_render module=report status=ok outcome=rendered company_count={} item_count={}",
        report.company_count(),
        report.item_count()
    );
    Ok(RenderOutcome::Rendered(output))
}

/// Line-oriented text renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl ReportRenderer for PlainTextRenderer {
    type Output = String;
    type Error = Infallible;

    fn render(&self, report: &ExpiringReport) -> Result<String, Infallible> {
        let mut lines = vec![
            REPORT_TITLE.to_string(),
            format!(
                "Window: {} .. {}",
                report.window().start(),
                report.window().end()
            ),
        ];

        for entry in report.entries() {
            lines.push(String::new());
            lines.push(company_line(entry));
            push_section(
                &mut lines,
                "  Extinguishers expiring:",
                &entry.lines_of(EquipmentKind::Extinguisher),
            );
            push_section(
                &mut lines,
                "  Hoses expiring:",
                &entry.lines_of(EquipmentKind::Hose),
            );
        }

        lines.push(String::new());
        lines.push("Page 1".to_string());
        Ok(lines.join("\n"))
    }
}

fn company_line(entry: &ReportEntry) -> String {
    format!(
        "Company: {} | Address: {} | City: {} | Registered: {}",
        entry.company.name,
        entry.company.address,
        entry.company.city.as_deref().unwrap_or(MISSING_CITY),
        entry.company.registered_at
    )
}

fn push_section(lines: &mut Vec<String>, heading: &str, items: &[EquipmentLine]) {
    if items.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    lines.extend(items.iter().map(item_line));
}

fn item_line(line: &EquipmentLine) -> String {
    match line.kind {
        EquipmentKind::Extinguisher => format!(
            "    Agent: {} | Quantity: {} | Capacity: {} | Registered: {} | Expires: {}",
            line.agent.map_or("-", |agent| agent.label()),
            line.quantity,
            line.capacity_or_length,
            line.registered_at,
            line.expires_at
        ),
        EquipmentKind::Hose => format!(
            "    Length: {} | Quantity: {} | Registered: {} | Expires: {}",
            line.capacity_or_length, line.quantity, line.registered_at, line.expires_at
        ),
    }
}
