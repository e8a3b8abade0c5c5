//! Strict reader for small comma-separated tables.
//!
//! The file drill feeds raw uploaded bytes through here, and the export
//! tests use it to read the log file back. Standard quoting rules; every
//! data row must match the header width.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::export::UTF8_BOM;

/// Why a table failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// No rows at all
    #[error("テーブルにデータがありません")]
    Empty,

    /// Bytes do not form the expected comma-separated shape
    #[error("{0}")]
    Malformed(String),
}

/// Parsed table: header row plus data rows, all the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// Parse CSV bytes. One leading UTF-8 BOM is tolerated; blank lines are
/// skipped.
pub fn parse_csv(bytes: &[u8]) -> Result<Table, TableError> {
    let bytes = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|_| TableError::Malformed("UTF-8として読めません".to_string()))?;

    let mut rows = tokenize(text)?;
    if rows.is_empty() {
        return Err(TableError::Empty);
    }

    let header = rows.remove(0);
    for (i, row) in rows.iter().enumerate() {
        if row.len() != header.len() {
            return Err(TableError::Malformed(format!(
                "{}行目の列数がヘッダーと一致しません",
                i + 2
            )));
        }
    }

    Ok(Table { header, rows })
}

fn tokenize(text: &str) -> Result<Vec<Vec<String>>, TableError> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut chars = text.chars().peekable();

    while chars.peek().is_some() {
        row.push(read_field(&mut chars)?);
        match chars.next() {
            Some(',') => {
                // a trailing comma still opens one more (empty) field
                if chars.peek().is_none() {
                    row.push(String::new());
                }
            }
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                flush_row(&mut rows, &mut row);
            }
            Some('\n') | None => flush_row(&mut rows, &mut row),
            Some(other) => {
                return Err(TableError::Malformed(format!(
                    "区切り文字の位置に不正な文字があります: {other:?}"
                )));
            }
        }
    }
    if !row.is_empty() {
        flush_row(&mut rows, &mut row);
    }

    Ok(rows)
}

fn flush_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
    let done = std::mem::take(row);
    // blank line
    if done.len() == 1 && done[0].is_empty() {
        return;
    }
    rows.push(done);
}

fn read_field(chars: &mut Peekable<Chars<'_>>) -> Result<String, TableError> {
    let mut field = String::new();

    if chars.peek() == Some(&'"') {
        chars.next();
        loop {
            match chars.next() {
                None => {
                    return Err(TableError::Malformed("引用符が閉じていません".to_string()));
                }
                Some('"') => match chars.peek() {
                    Some('"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some(',') | Some('\n') | Some('\r') | None => break,
                    Some(_) => {
                        return Err(TableError::Malformed(
                            "引用符の後に余分な文字があります".to_string(),
                        ));
                    }
                },
                Some(c) => field.push(c),
            }
        }
    } else {
        while let Some(&c) = chars.peek() {
            match c {
                ',' | '\n' | '\r' => break,
                '"' => {
                    return Err(TableError::Malformed("引用符の位置が不正です".to_string()));
                }
                _ => {
                    field.push(c);
                    chars.next();
                }
            }
        }
    }

    Ok(field)
}
