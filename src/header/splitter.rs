//! Quote-aware splitting of a ZINC header line into column definitions

/// Split a header line on commas that are outside double quotes.
///
/// A backslash makes the following character literal, so `\"` never toggles
/// the quote state. The segment after the last comma is always returned, even
/// when it is empty.
pub fn split_columns(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut inside_quotes = false;
    let mut start = 0;
    let mut chars = line.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => {
                segments.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    segments.push(&line[start..]);
    segments
}
