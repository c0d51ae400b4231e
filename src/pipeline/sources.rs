// src/pipeline/sources.rs

//! Origin survey.

use crate::error::Result;
use crate::services::{ContentService, ProbeReport};

/// Probe every origin and print reachability, latency and quality.
pub async fn run_sources(service: &ContentService) -> Result<()> {
    let reports = service.selector().survey().await;
    let preferred = service.cache().preferred_source().await;

    let reachable = reports.iter().filter(|r| r.reachable).count();
    log::info!("{} of {} sources reachable", reachable, reports.len());

    print!("{}", render_reports(&reports, preferred.as_deref()));
    Ok(())
}

pub fn render_reports(reports: &[ProbeReport], preferred: Option<&str>) -> String {
    let mut out = String::new();
    for report in reports {
        let marker = if preferred == Some(report.source.name.as_str()) {
            '*'
        } else {
            ' '
        };
        let status = match report.quality() {
            Some(quality) => format!(
                "ok {:>5}ms {}",
                report.latency.as_millis(),
                quality.label()
            ),
            None => "unreachable".to_string(),
        };
        let base = if report.source.is_local() {
            "(same origin)"
        } else {
            report.source.base_url.as_str()
        };
        out.push_str(&format!(
            "{} {}. {:<10} {:<22} {}\n",
            marker, report.source.priority, report.source.name, status, base
        ));
    }
    if preferred.is_some() {
        out.push_str("* preferred source\n");
    }
    out
}
