use std::fmt;

use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::cell_format::format_number;

// Same shape a published-sheet export uses for plain numbers; dates, times and
// grouped thousands stay text.
static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*-?(\d+\.?|\.\d+|\d+\.\d+)([eE][-+]?\d+)?\s*$").expect("valid numeric regex")
});

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Opportunistic type inference for a raw field.
    pub fn infer(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return CellValue::Empty;
        }
        if NUMERIC.is_match(raw)
            && let Ok(value) = raw.trim().parse::<f64>()
            && value.is_finite()
            && value.abs() <= MAX_SAFE_INTEGER
        {
            return CellValue::Number(value);
        }
        CellValue::Text(raw.to_string())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(_) => false,
            CellValue::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(v) => f.write_str(&format_number(*v)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One data line, keyed by header in source order.
///
/// Fields under blank headers, and surplus fields of over-long lines, are kept
/// so search still sees them, but no column plan can select them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new(fields: Vec<(String, CellValue)>) -> Self {
        Self { fields }
    }

    /// Convenience for tests and fixtures: infers every value.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            fields: pairs
                .iter()
                .map(|(h, v)| (h.to_string(), CellValue::infer(v)))
                .collect(),
        }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v)
    }

    /// Display text of a field; absent and empty both read as "".
    pub fn text(&self, header: &str) -> String {
        self.get(header).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn is_blank(&self) -> bool {
        self.values().all(CellValue::is_blank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    TooFewFields,
    TooManyFields,
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeWarning {
    pub line: u64,
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    /// Raw header line, blanks included.
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub warnings: Vec<DecodeWarning>,
}

impl Sheet {
    /// Non-blank headers in source order; the only columns a plan may use.
    pub fn header_set(&self) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| !h.trim().is_empty())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode a published-sheet CSV export.
///
/// Never fails: malformed lines become warnings and the rows that did parse
/// are returned. Rows whose fields are all blank are dropped.
pub fn decode_sheet(text: &str) -> Sheet {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut sheet = Sheet::default();
    match reader.headers() {
        Ok(headers) => sheet.headers = headers.iter().map(str::to_string).collect(),
        Err(err) => {
            sheet.warnings.push(DecodeWarning {
                line: 1,
                kind: WarningKind::Malformed,
                message: format!("unreadable header line: {err}"),
            });
            return sheet;
        }
    }
    let width = sheet.headers.len();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or_default();
                sheet.warnings.push(DecodeWarning {
                    line,
                    kind: WarningKind::Malformed,
                    message: err.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() < width {
            sheet.warnings.push(DecodeWarning {
                line,
                kind: WarningKind::TooFewFields,
                message: format!("expected {width} fields, found {}", record.len()),
            });
        } else if record.len() > width {
            sheet.warnings.push(DecodeWarning {
                line,
                kind: WarningKind::TooManyFields,
                message: format!("expected {width} fields, found {}", record.len()),
            });
        }

        // Values past the header line are kept under an empty header, like
        // values under blank headers: searchable, never plannable.
        let fields = (0..width.max(record.len()))
            .map(|idx| {
                let header = sheet.headers.get(idx).cloned().unwrap_or_default();
                let value = record.get(idx).map(CellValue::infer).unwrap_or(CellValue::Empty);
                (header, value)
            })
            .collect();
        let row = Row::new(fields);
        if !row.is_blank() {
            sheet.rows.push(row);
        }
    }

    sheet
}
