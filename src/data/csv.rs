//! CSV table parsing.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Mandatory header row naming every column
//! - Double-quoted fields with embedded commas and `""` escapes
//! - Blank lines are skipped; every other row must match the header width
use crate::error::{NnError, Result};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Raw string cells keyed by header name. Typing happens in `encode`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers.iter()
            .position(|h| h == name)
            .ok_or_else(|| NnError::Csv(format!("no column named '{}'", name)))
    }

    pub fn column<'a>(&'a self, name: &str) -> Result<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| row[idx].as_str()))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn read_table(path: &str) -> Result<Table> {
    let text = std::fs::read_to_string(path)?;
    parse_table(&text)
}

pub fn parse_table(text: &str) -> Result<Table> {
    let mut lines = text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let headers: Vec<String> = match lines.next() {
        Some((_, line)) => parse_csv_row(line.trim()).into_iter().map(|h| h.trim().to_string()).collect(),
        None => return Err(NnError::Csv("CSV file is empty".into())),
    };

    let mut rows = Vec::new();
    for (line_idx, line) in lines {
        let cells = parse_csv_row(line.trim());
        if cells.len() != headers.len() {
            return Err(NnError::Csv(format!(
                "Row {}: expected {} columns, got {}",
                line_idx + 1,
                headers.len(),
                cells.len()
            )));
        }
        rows.push(cells);
    }

    if rows.is_empty() {
        return Err(NnError::Csv("CSV contains no data rows after the header".into()));
    }

    Ok(Table { headers, rows })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = parse_table("id,gender,age\n1,Male,67\n\n2,Female,61.5\n").unwrap();
        assert_eq!(table.headers, vec!["id", "gender", "age"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["2", "Female", "61.5"]);
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        assert_eq!(
            parse_csv_row(r#"a,"b, c","say ""hi""""#),
            vec!["a", "b, c", "say \"hi\""]
        );
    }

    #[test]
    fn ragged_row_reports_line_number() {
        let err = parse_table("a,b\n1,2\n3\n").unwrap_err();
        match err {
            NnError::Csv(msg) => assert!(msg.starts_with("Row 3"), "{}", msg),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn empty_and_header_only_are_errors() {
        assert!(parse_table("").is_err());
        assert!(parse_table("a,b\n").is_err());
    }

    #[test]
    fn column_lookup() {
        let table = parse_table("x,y\n1,2\n3,4\n").unwrap();
        let ys: Vec<&str> = table.column("y").unwrap().collect();
        assert_eq!(ys, vec!["2", "4"]);
        assert!(table.column_index("z").is_err());
    }
}
