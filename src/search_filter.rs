use crate::sheet_decode::Row;

/// Case-insensitive substring match over every raw field of the row,
/// including fields under blank headers.
pub fn row_matches(row: &Row, needle_lower: &str) -> bool {
    row.values()
        .any(|v| v.to_string().to_lowercase().contains(needle_lower))
}

/// Rows where any field contains `query`. A blank query keeps everything in
/// the original order.
pub fn filter_rows(rows: &[Row], query: &str) -> Vec<Row> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| row_matches(row, &needle))
        .cloned()
        .collect()
}
