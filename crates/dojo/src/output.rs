//! Terminal rendering for the practice session.
//!
//! ASCII status tags, color via owo-colors. Width-aware padding so the
//! Japanese log columns line up.

use std::io::{self, Write};

use console::measure_text_width;
use dojo_common::{ErrorKind, ErrorRecord, Outcome, LOG_HEADER};
use owo_colors::OwoColorize;

pub fn banner() {
    println!();
    println!("{}", "エラー処理マスター - error dojo".bright_white().bold());
    println!(
        "{}",
        "エラーが起きても安全に動くプログラムを学びます".dimmed()
    );
    println!("{}", "コマンド一覧は help、終了は quit".dimmed());
    println!();
}

pub fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{} ", "dojo>".bright_cyan())?;
    stdout.flush()
}

/// Show a drill's outcome: status line, hint, detail lines.
pub fn render_outcome(outcome: &Outcome) {
    if outcome.ok {
        println!("{} {}", "[OK]".bright_green(), outcome.headline);
    } else {
        println!("{} {}", "[ERROR]".bright_red(), outcome.headline);
    }
    if let Some(hint) = &outcome.hint {
        println!("{} {}", "[HINT]".yellow(), hint);
    }
    for line in &outcome.details {
        println!("   {line}");
    }
}

pub fn notice(message: &str) {
    println!("{} {}", "[INFO]".cyan(), message);
}

pub fn usage(message: &str) {
    println!("{} {}", "[USAGE]".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "[ERROR]".bright_red(), message);
}

/// Tabular log view, or the no-errors notice.
pub fn render_log(records: &[ErrorRecord]) {
    if records.is_empty() {
        notice("まだエラーは発生していません");
        return;
    }

    println!("合計 {} 件のエラー", records.len());
    println!();

    let rows: Vec<[&str; 5]> = records
        .iter()
        .map(|r| {
            [
                r.timestamp.as_str(),
                r.location.as_str(),
                r.error_kind.as_str(),
                r.input_value.as_str(),
                r.message.as_str(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = LOG_HEADER.iter().map(|h| measure_text_width(h)).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    print_row(&LOG_HEADER, &widths);
    let rule = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    println!("{}", "-".repeat(rule).dimmed());
    for row in &rows {
        print_row(row, &widths);
    }
    println!();
}

fn print_row(cells: &[&str; 5], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("   ");
        }
        line.push_str(cell);
        let pad = width.saturating_sub(measure_text_width(cell));
        line.push_str(&" ".repeat(pad));
    }
    println!("{}", line.trim_end());
}

/// Machine-readable dump of the log, same column names as the export.
pub fn render_log_json(records: &[ErrorRecord]) {
    match serde_json::to_string_pretty(records) {
        Ok(json) => println!("{json}"),
        Err(err) => error(&format!("JSONに変換できません: {err}")),
    }
}

pub fn help() {
    println!();
    println!("{}", "ドリル".bright_white().bold());
    println!("  check <文字列>                    文字列を整数に変換します");
    println!("  pick <番号 0-10>                  5件のリストから取得します（有効は0-4）");
    println!("  div <割られる数> <割る数>         割り算を実行します");
    println!("  profit <販売> <仕入れ> <手数料%>  利益を計算します");
    println!("  load <パス>                       CSVファイルを読み込みます");
    println!();
    println!("{}", "ログ".bright_white().bold());
    println!("  log           エラーログを表示します");
    println!("  log json      エラーログをJSONで表示します");
    println!("  export [dir]  エラーログをCSVで保存します");
    println!("  clear         エラーログを空にします");
    println!();
    println!("{}", "エラーの種類".bright_white().bold());
    for kind in ErrorKind::ALL {
        println!("  {:<26} {}", kind.as_str(), kind.description());
    }
    println!();
}

pub fn farewell(logged: usize) {
    println!();
    if logged == 0 {
        println!("お疲れさまでした。エラーは1件も記録されませんでした");
    } else {
        println!("お疲れさまでした。{logged} 件のエラーを記録しました");
    }
}
