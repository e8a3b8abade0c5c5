//! CSV export of the error log, plus the static demonstration table.
//!
//! Output is UTF-8 with a leading BOM so spreadsheet tools pick the right
//! encoding for the Japanese column names. Same records in, same bytes out.

use chrono::NaiveDate;

use crate::record::ErrorRecord;

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Export header, field order fixed.
pub const LOG_HEADER: [&str; 5] = ["時刻", "場所", "エラー", "入力値", "メッセージ"];

/// Filename of the demonstration table.
pub const SAMPLE_FILENAME: &str = "sample.csv";

/// Serialize records into the downloadable log file.
///
/// An empty slice yields the header row alone.
pub fn export_csv(records: &[ErrorRecord]) -> Vec<u8> {
    let mut out = String::new();
    push_row(&mut out, &LOG_HEADER);
    for r in records {
        push_row(
            &mut out,
            &[
                &r.timestamp,
                &r.location,
                &r.error_kind,
                &r.input_value,
                &r.message,
            ],
        );
    }
    finish(out)
}

/// `error_log_<YYYYMMDD>.csv`, dated at the export moment.
pub fn export_filename(date: NaiveDate) -> String {
    format!("error_log_{}.csv", date.format("%Y%m%d"))
}

/// Fixed 3-row demonstration table, offered unconditionally.
pub fn sample_csv() -> Vec<u8> {
    let mut out = String::new();
    push_row(&mut out, &["商品名", "販売価格", "仕入れ価格"]);
    push_row(&mut out, &["商品A", "1000", "700"]);
    push_row(&mut out, &["商品B", "2000", "1500"]);
    push_row(&mut out, &["商品C", "1500", "1000"]);
    finish(out)
}

fn finish(out: String) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + out.len());
    bytes.extend_from_slice(&UTF8_BOM);
    bytes.extend_from_slice(out.as_bytes());
    bytes
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    if field.contains(['"', ',', '\n', '\r']) {
        out.push('"');
        for ch in field.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}
