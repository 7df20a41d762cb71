use serde::{Deserialize, Serialize};
use shared::{
    cell::CellRef,
    domain::{StatusField, StatusToken, StatusTriple},
    error::StatusFailure,
};
use tracing::debug;
use url::Url;

/// Cell references for each status, as the operator typed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMap {
    pub range: String,
    pub weather: String,
    pub vehicle: String,
}

impl Default for CellMap {
    fn default() -> Self {
        Self {
            range: "L2".into(),
            weather: "L3".into(),
            vehicle: "L4".into(),
        }
    }
}

impl CellMap {
    pub fn resolve(&self) -> Result<[(StatusField, CellRef); 3], StatusFailure> {
        let parse = |field: StatusField, raw: &str| {
            raw.parse::<CellRef>()
                .map(|cell| (field, cell))
                .map_err(|err| StatusFailure::parse(format!("{field} cell: {err}")))
        };

        Ok([
            parse(StatusField::Range, &self.range)?,
            parse(StatusField::Weather, &self.weather)?,
            parse(StatusField::Vehicle, &self.vehicle)?,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetSource {
    pub url: String,
    pub cells: CellMap,
    /// Page to embed when polling has degraded to fallback mode.
    pub embed_url: Option<String>,
}

impl SheetSource {
    pub fn new(url: impl Into<String>, cells: CellMap) -> Self {
        Self {
            url: url.into(),
            cells,
            embed_url: None,
        }
    }

    pub fn embed_url(&self) -> String {
        self.embed_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| derive_embed_url(&self.url))
    }
}

/// Best-effort HTML view for a CSV export link. Published sheets switch
/// `output=csv` to `output=html`; export links switch to `htmlview`.
pub fn derive_embed_url(csv_url: &str) -> String {
    let trimmed = csv_url.trim();
    if trimmed.contains("output=csv") {
        return trimmed.replacen("output=csv", "output=html", 1);
    }
    if let Some(idx) = trimmed.find("/export?") {
        let (base, query) = trimmed.split_at(idx);
        let rest: Vec<&str> = query["/export?".len()..]
            .split('&')
            .filter(|pair| !pair.is_empty() && *pair != "format=csv")
            .collect();
        return if rest.is_empty() {
            format!("{base}/htmlview")
        } else {
            format!("{base}/htmlview?{}", rest.join("&"))
        };
    }
    trimmed.to_string()
}

/// Appends a `_cb` query parameter so intermediaries cannot serve a stale
/// export.
pub fn cache_busted_url(raw: &str, stamp: i64) -> Result<String, StatusFailure> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| StatusFailure::invalid_input(format!("invalid sheet link '{raw}': {err}")))?;
    url.query_pairs_mut().append_pair("_cb", &stamp.to_string());
    Ok(url.to_string())
}

/// Reads the configured cells out of a CSV body. Cells outside the data
/// read as N/A.
pub fn extract_statuses(
    csv_text: &str,
    cells: &[(StatusField, CellRef)],
) -> Result<StatusTriple, StatusFailure> {
    let looks_like_html = csv_text
        .trim_start()
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doc") || head.eq_ignore_ascii_case("<html"));
    if looks_like_html {
        return Err(StatusFailure::parse(
            "sheet returned an HTML page instead of CSV; is the link a published CSV export?",
        ));
    }

    let needed_rows = cells.iter().map(|(_, cell)| cell.row).max().unwrap_or(0);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    // Row numbers come from operator input; only rows actually present are
    // collected.
    let mut rows = Vec::new();
    for record in reader.records().take(needed_rows) {
        let record = record.map_err(|err| StatusFailure::parse(format!("malformed CSV: {err}")))?;
        rows.push(record);
    }

    let mut triple = StatusTriple::unavailable();
    for (field, cell) in cells {
        let (row, column) = cell.indices();
        let token = rows
            .get(row)
            .and_then(|record| record.get(column))
            .map(|raw| StatusToken::normalize(&raw.trim().to_uppercase()))
            .unwrap_or(StatusToken::NotAvailable);
        debug!(%field, %cell, %token, "read status cell");
        triple.set(*field, token);
    }

    Ok(triple)
}

#[cfg(test)]
#[path = "tests/sheet_tests.rs"]
mod tests;
