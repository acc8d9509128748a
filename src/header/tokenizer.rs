//! Tokenizer for a single ZINC column definition
//!
//! A column definition has the shape `colName (SP tag (":" value)?)*`. The
//! scanner is a small state machine over the characters of the definition:
//! it looks for tag names, reads plain or quoted values, and has a dedicated
//! state for ref literals (`@id "Display Name"`) whose display name may
//! contain spaces.

use chrono::DateTime;
use tracing::trace;

/// A tag value as it appears in the header, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Marker,
    /// Value text exactly as written, quotes and escapes included
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefPhase {
    Id,
    DisplayName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekingTag,
    ReadingValue,
    ReadingRef(RefPhase),
}

/// Split one column definition into `(tag, value)` pairs.
///
/// The first pair is the column name as a marker. Backslash escapes are
/// copied through untouched and never change state.
pub fn tokenize_column(definition: &str) -> Vec<(String, RawValue)> {
    let chars: Vec<char> = definition.chars().collect();
    let mut tokens = Vec::new();
    let mut state = State::SeekingTag;
    let mut tag = String::new();
    let mut text = String::new();
    let mut in_quotes = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            text.push(c);
            if let Some(&escaped) = chars.get(i + 1) {
                text.push(escaped);
            }
            i += 2;
            continue;
        }

        match state {
            State::SeekingTag => match c {
                ':' => {
                    tag = std::mem::take(&mut text);
                    in_quotes = false;
                    if chars.get(i + 1) == Some(&'@') {
                        text.push('@');
                        i += 1;
                        state = State::ReadingRef(RefPhase::Id);
                    } else {
                        state = State::ReadingValue;
                    }
                }
                ' ' => {
                    if !text.is_empty() {
                        tokens.push((std::mem::take(&mut text), RawValue::Marker));
                    }
                }
                _ => text.push(c),
            },
            State::ReadingValue => match c {
                '"' => {
                    in_quotes = !in_quotes;
                    text.push(c);
                }
                ' ' if !in_quotes => {
                    if let Some(end) = timezone_word_end(&chars, i + 1, &text) {
                        text.push(' ');
                        text.extend(&chars[i + 1..end]);
                        i = end;
                        continue;
                    }
                    tokens.push((
                        std::mem::take(&mut tag),
                        RawValue::Text(std::mem::take(&mut text)),
                    ));
                    state = State::SeekingTag;
                }
                _ => text.push(c),
            },
            State::ReadingRef(RefPhase::Id) => match c {
                ' ' => {
                    if chars.get(i + 1) == Some(&'"') {
                        text.push_str(" \"");
                        i += 2;
                        state = State::ReadingRef(RefPhase::DisplayName);
                        continue;
                    }
                    // Ref without a display name
                    tokens.push((
                        std::mem::take(&mut tag),
                        RawValue::Text(std::mem::take(&mut text)),
                    ));
                    state = State::SeekingTag;
                }
                _ => text.push(c),
            },
            State::ReadingRef(RefPhase::DisplayName) => match c {
                '"' if matches!(chars.get(i + 1), None | Some(' ')) => {
                    text.push(c);
                    tokens.push((
                        std::mem::take(&mut tag),
                        RawValue::Text(std::mem::take(&mut text)),
                    ));
                    state = State::SeekingTag;
                }
                _ => text.push(c),
            },
        }

        i += 1;
    }

    match state {
        State::SeekingTag => {
            if !text.is_empty() {
                tokens.push((text, RawValue::Marker));
            }
        }
        State::ReadingValue | State::ReadingRef(_) => {
            tokens.push((tag, RawValue::Text(text)));
        }
    }

    trace!("Tokenized column definition into {} pairs", tokens.len());
    tokens
}

/// If `value` is a bare timestamp and the word starting at `start` looks like
/// a timezone name (`Los_Angeles`, `GMT-10`), return the index just past it.
fn timezone_word_end(chars: &[char], start: usize, value: &str) -> Option<usize> {
    let first = chars.get(start)?;
    if !first.is_ascii_uppercase() || value.starts_with('"') {
        return None;
    }

    let end = chars[start..]
        .iter()
        .position(|&c| c == ' ')
        .map_or(chars.len(), |offset| start + offset);
    if chars[start..end].iter().any(|&c| c == ':' || c == '"' || c == '\\') {
        return None;
    }

    DateTime::parse_from_rfc3339(value).ok().map(|_| end)
}
