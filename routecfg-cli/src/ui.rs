//! Plain-text rendering for listings and prompts.

use std::io::{BufRead, Write};

use routecfg_core::{ConfigDocument, RouterRole, SyncOutcome, SyncReport};

/// Column-aligned table with a title line.
pub struct Table {
    title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self, out: &mut dyn Write) -> std::io::Result<()> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        writeln!(out, "{}", self.title)?;
        write_row(out, &self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(out, &rule, &widths)?;
        for row in &self.rows {
            write_row(out, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(out: &mut dyn Write, cells: &[String], widths: &[usize]) -> std::io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect();
    writeln!(out, "{}", line.join("  ").trim_end())
}

/// Models grouped by provider.
pub fn models_table(doc: &ConfigDocument) -> Table {
    let mut table = Table::new("Available Models", &["Provider", "Base URL", "Models"]);
    for (id, provider) in doc.providers() {
        let models = if provider.models.is_empty() {
            "(no models)".to_string()
        } else {
            provider.models.join(", ")
        };
        table.add_row(vec![id.to_string(), provider.base_url.clone(), models]);
    }
    table
}

/// Every router role with its binding.
pub fn routers_table(doc: &ConfigDocument) -> Table {
    let mut table = Table::new(
        "Current Router Configuration",
        &["Router", "Provider", "Model", "Threshold"],
    );
    for role in RouterRole::all() {
        let row = match doc.router(*role) {
            Some(a) => vec![
                role.to_string(),
                a.provider_id.clone(),
                a.model_id.clone(),
                a.threshold.map(|t| t.to_string()).unwrap_or_default(),
            ],
            None => vec![
                role.to_string(),
                "(unset)".to_string(),
                String::new(),
                String::new(),
            ],
        };
        table.add_row(row);
    }
    table
}

/// Per-provider results of a full update.
pub fn sync_table(reports: &[SyncReport]) -> Table {
    let mut table = Table::new(
        "Model Update Results",
        &["Provider", "Status", "Added", "Total"],
    );
    for report in reports {
        let row = match &report.outcome {
            SyncOutcome::Synced { added, total } => vec![
                report.provider.clone(),
                "Success".to_string(),
                added.len().to_string(),
                total.to_string(),
            ],
            SyncOutcome::Skipped => vec![
                report.provider.clone(),
                "No baseUrl".to_string(),
                "-".to_string(),
                "-".to_string(),
            ],
            SyncOutcome::Failed(e) => vec![
                report.provider.clone(),
                format!("Error: {}", e),
                "-".to_string(),
                "-".to_string(),
            ],
        };
        table.add_row(row);
    }
    table
}

/// Ask before a destructive change. Anything but `y` cancels.
pub fn confirm(out: &mut dyn Write, input: &mut dyn BufRead) -> std::io::Result<bool> {
    write!(out, "ARE YOU SURE?! [y/N]: ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
