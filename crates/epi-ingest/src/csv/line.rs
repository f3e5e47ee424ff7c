//! Line-level CSV scanning: logical records, delimiter detection, fields.

/// Delimiters considered by [`detect_delimiter`], in tie-break order.
pub const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Pick the delimiter that occurs most often in the header row.
///
/// Occurrences inside quoted text are ignored. Ties resolve in the order
/// comma, semicolon, tab, pipe; a header with none of them is comma-delimited.
pub fn detect_delimiter(header_line: &str) -> char {
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for ch in header_line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(index) = CANDIDATE_DELIMITERS.iter().position(|&d| d == ch) {
            counts[index] += 1;
        }
    }

    let mut best = 0;
    for index in 1..counts.len() {
        if counts[index] > counts[best] {
            best = index;
        }
    }
    if counts[best] == 0 {
        ','
    } else {
        CANDIDATE_DELIMITERS[best]
    }
}

/// Parses a CSV line into fields, handling quoted values.
///
/// A quote opens a quoted field only at the start of a field (leading
/// blanks allowed); anywhere else it is a literal character. A doubled
/// quote inside a quoted field yields one literal quote; a delimiter
/// outside quotes ends the field. Every field is trimmed.
pub fn parse_csv_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                // Check for escaped quote ("")
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
                at_field_start = true;
            }
            _ => {
                if in_quotes || !c.is_whitespace() {
                    at_field_start = false;
                }
                current.push(c);
            }
        }
    }

    // Don't forget the last field
    fields.push(current.trim().to_string());
    fields
}

/// A logical record: one or more physical lines joined by quoted newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based physical line number where the record starts.
    pub line: usize,
    pub text: String,
}

/// Split text into logical records, keeping newlines that sit inside quotes.
///
/// Quotes follow the same field-start rule as [`parse_csv_line`]. With no
/// delimiter, any of [`CANDIDATE_DELIMITERS`] starts a field, which is
/// enough to find the header before the delimiter is known.
///
/// A quoted field that is still open at the end of the text does not
/// swallow the rest of the file: its first physical line becomes a record
/// of its own and scanning resumes on the next line.
///
/// Accepts `\n` and `\r\n` endings and drops blank records.
pub fn split_records(text: &str, delimiter: Option<char>) -> Vec<LogicalLine> {
    let is_delimiter = |ch: char| match delimiter {
        Some(delimiter) => ch == delimiter,
        None => CANDIDATE_DELIMITERS.contains(&ch),
    };
    let mut records = Vec::new();
    let mut offset = 0;
    let mut line = 1;

    while offset < text.len() {
        let rest = &text[offset..];
        let mut current = String::new();
        let mut in_quotes = false;
        let mut at_field_start = true;
        let mut start_line = line;
        let mut record_start = 0;
        let mut chars = rest.char_indices().peekable();

        while let Some((index, ch)) = chars.next() {
            match ch {
                '"' if in_quotes => {
                    current.push(ch);
                    if chars.peek().is_some_and(|&(_, next)| next == '"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                '"' if at_field_start => {
                    in_quotes = true;
                    at_field_start = false;
                    current.push(ch);
                }
                '\n' if !in_quotes => {
                    push_record(&mut records, &mut current, start_line);
                    line += 1;
                    start_line = line;
                    record_start = index + 1;
                    at_field_start = true;
                }
                '\n' => {
                    current.push(ch);
                    line += 1;
                }
                ch if is_delimiter(ch) && !in_quotes => {
                    current.push(ch);
                    at_field_start = true;
                }
                _ => {
                    if in_quotes || !ch.is_whitespace() {
                        at_field_start = false;
                    }
                    current.push(ch);
                }
            }
        }

        if !in_quotes {
            push_record(&mut records, &mut current, start_line);
            break;
        }

        // Unterminated quote: keep only the first physical line of the
        // open record and rescan from the line after it.
        let open = &rest[record_start..];
        let first_len = open.find('\n').unwrap_or(open.len());
        let mut first = open[..first_len].to_string();
        push_record(&mut records, &mut first, start_line);
        offset += record_start + first_len + 1;
        line = start_line + 1;
    }
    records
}
