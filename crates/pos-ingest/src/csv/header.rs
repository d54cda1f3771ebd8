//! CSV header normalization.

const UTF8_BOM: char = '\u{feff}';

/// Normalizes a header value by trimming whitespace and a leading BOM.
pub fn normalize_header(value: &str) -> String {
    value.trim_start_matches(UTF8_BOM).trim().to_string()
}

/// Normalizes a header row. Blank cells become `Column N` (one based) so every
/// column stays addressable.
pub fn normalize_headers<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    raw.into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let header = normalize_header(value);
            if header.is_empty() {
                format!("Column {}", idx + 1)
            } else {
                header
            }
        })
        .collect()
}
