use crate::models::ParameterGroup;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Before-treatment column markers, matched against any header segment.
static BEFORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(bt|b\.t|before)\b").unwrap());

/// After-treatment and day-related tokens used by the before-column fallback.
static AFTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(at|after|day|d|7|14|21|28)\b").unwrap());

/// Treatment/day tokens stripped from a column's top label so that columns
/// like "Vedana BT" and "Vedana AT 7th" resolve to the same parameter.
static LABEL_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(bt|b\.t|at|before|after|day|d|\d+(st|nd|rd|th)|7|14|21|28)\b").unwrap()
});

/// Serial-number and identifier columns carry no measurements.
const SKIP_LABELS: [&str; 5] = ["sl", "slno", "no", "patient", "id"];

/// Groups sheet columns by clinical parameter, pairing one before-treatment
/// column with the ordered after-treatment columns. Groups that cannot be
/// paired are dropped silently.
pub struct ParameterGrouper;

impl ParameterGrouper {
    pub fn group(headers: &[String]) -> Vec<ParameterGroup> {
        let mut order: Vec<String> = Vec::new();
        let mut columns: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, header) in headers.iter().enumerate() {
            let display = parameter_display_name(header);
            let key = normalize_label(&display);
            if key.is_empty() || SKIP_LABELS.contains(&key.as_str()) {
                continue;
            }
            if !columns.contains_key(&key) {
                order.push(key.clone());
            }
            columns.entry(key).or_default().push(idx);
        }

        order
            .iter()
            .filter_map(|key| Self::build_group(headers, &columns[key]))
            .collect()
    }

    fn build_group(headers: &[String], cols: &[usize]) -> Option<ParameterGroup> {
        let before_column = Self::pick_before_column(headers, cols)?;
        let after_columns: Vec<usize> = cols
            .iter()
            .copied()
            .filter(|&col| col != before_column)
            .collect();
        if after_columns.is_empty() {
            return None;
        }
        let after_labels = after_columns
            .iter()
            .map(|&col| headers[col].clone())
            .collect();
        Some(ParameterGroup {
            name: parameter_display_name(&headers[cols[0]]),
            before_column,
            after_columns,
            after_labels,
        })
    }

    /// Before-column selection: an explicit BT/before marker wins; failing
    /// that, the first column with no after/day token; failing that, the
    /// first column of the group.
    fn pick_before_column(headers: &[String], cols: &[usize]) -> Option<usize> {
        if let Some(&col) = cols
            .iter()
            .find(|&&col| segments(&headers[col]).any(|seg| BEFORE_RE.is_match(seg)))
        {
            return Some(col);
        }
        if let Some(&col) = cols
            .iter()
            .find(|&&col| !segments(&headers[col]).any(|seg| AFTER_RE.is_match(seg)))
        {
            return Some(col);
        }
        cols.first().copied()
    }
}

fn segments(header: &str) -> impl Iterator<Item = &str> {
    header.split('|').map(str::trim)
}

/// Human-readable parameter name: the top header segment with treatment and
/// day tokens removed.
pub fn parameter_display_name(header: &str) -> String {
    let top = header.split('|').next().unwrap_or("").trim();
    let stripped = LABEL_TOKEN_RE.replace_all(top, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased, alphanumeric-only form used for grouping and cross-sheet
/// parameter matching.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}
