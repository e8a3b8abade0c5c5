//! Interactive practice session loop.
//!
//! One line in, one drill (or log command) out. A drill failure is session
//! content, never a reason to stop the loop.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use dojo_common::{unclassified_failure, Action, Outcome, Session, LOCATION_FILE, PICK_INDEX_MAX};
use tracing::info;

use crate::output;

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Drill(Action),
    Load { path: PathBuf },
    ShowLog,
    DumpJson,
    Export { out: Option<PathBuf> },
    Clear,
    Help,
    Quit,
    Nothing,
}

/// Why a line could not be turned into a command. Usage problems stay at the
/// prompt; they never reach the session or its log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError(pub String);

pub fn run() -> Result<()> {
    let mut session = Session::new();
    info!(session = %session.id(), "practice session opened");
    output::banner();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        output::prompt()?;
        let Some(line) = lines.next() else { break };
        let line = line?;

        match parse_command(&line) {
            Ok(Command::Nothing) => {}
            Ok(Command::Quit) => break,
            Ok(Command::Help) => output::help(),
            Ok(Command::Drill(action)) => {
                let outcome = session.dispatch(action);
                output::render_outcome(&outcome);
            }
            Ok(Command::Load { path }) => {
                let outcome = load_file(&mut session, &path);
                output::render_outcome(&outcome);
            }
            Ok(Command::ShowLog) => output::render_log(session.store().read_all()),
            Ok(Command::DumpJson) => output::render_log_json(session.store().read_all()),
            Ok(Command::Export { out }) => export_log(&session, out.as_deref()),
            Ok(Command::Clear) => {
                session.clear_log();
                output::notice("ログをクリアしました");
            }
            Err(UsageError(message)) => output::usage(&message),
        }
    }

    let elapsed = Local::now().signed_duration_since(session.started_at());
    info!(
        session = %session.id(),
        seconds = elapsed.num_seconds(),
        logged = session.store().len(),
        "practice session closed"
    );
    output::farewell(session.store().len());
    Ok(())
}

/// Read the upload from disk. A file that cannot be read at all is outside
/// the closed failure categories and lands in the log as unclassified.
fn load_file(session: &mut Session, path: &Path) -> Outcome {
    let name = path.display().to_string();
    match std::fs::read(path) {
        Ok(bytes) => session.dispatch(Action::LoadTable { name, bytes }),
        Err(err) => session.report(unclassified_failure(LOCATION_FILE, name, err.to_string())),
    }
}

fn export_log(session: &Session, out: Option<&Path>) {
    match session.export_log(Local::now().date_naive()) {
        None => output::notice("まだエラーは発生していません"),
        Some((filename, bytes)) => {
            let dir = out.unwrap_or_else(|| Path::new("."));
            let path = dir.join(filename);
            match std::fs::write(&path, &bytes) {
                Ok(()) => output::notice(&format!("{} を保存しました", path.display())),
                Err(err) => output::error(&format!("書き込みに失敗しました: {err}")),
            }
        }
    }
}

pub fn parse_command(line: &str) -> Result<Command, UsageError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "check" => {
            if rest.is_empty() {
                return Err(UsageError("使い方: check <文字列>".to_string()));
            }
            Ok(Command::Drill(Action::CheckNumber {
                input: rest.to_string(),
            }))
        }
        "pick" => {
            let index: usize = rest
                .parse()
                .map_err(|_| UsageError("使い方: pick <番号 0-10>".to_string()))?;
            if index > PICK_INDEX_MAX {
                return Err(UsageError(format!(
                    "番号は0〜{PICK_INDEX_MAX}で指定してください"
                )));
            }
            Ok(Command::Drill(Action::PickItem { index }))
        }
        "div" => {
            let usage = || UsageError("使い方: div <割られる数> <割る数>".to_string());
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(a), Some(b), None) => {
                    let dividend = a.parse().map_err(|_| usage())?;
                    let divisor = b.parse().map_err(|_| usage())?;
                    Ok(Command::Drill(Action::Divide { dividend, divisor }))
                }
                _ => Err(usage()),
            }
        }
        "profit" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(sales), Some(cost), Some(fee), None) => {
                    Ok(Command::Drill(Action::Profit {
                        sales: sales.to_string(),
                        cost: cost.to_string(),
                        fee: fee.to_string(),
                    }))
                }
                _ => Err(UsageError(
                    "使い方: profit <販売価格> <仕入れ価格> <手数料率%>".to_string(),
                )),
            }
        }
        "load" => {
            if rest.is_empty() {
                return Err(UsageError("使い方: load <CSVファイルのパス>".to_string()));
            }
            Ok(Command::Load {
                path: PathBuf::from(rest),
            })
        }
        "log" => match rest {
            "" => Ok(Command::ShowLog),
            "json" => Ok(Command::DumpJson),
            _ => Err(UsageError("使い方: log または log json".to_string())),
        },
        "export" => Ok(Command::Export {
            out: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        }),
        "clear" => Ok(Command::Clear),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(UsageError(format!(
            "不明なコマンド: {other}（help で一覧）"
        ))),
    }
}
