//! The practice drills.
//!
//! Each drill wraps one failure-prone operation, catches the failure, and
//! reports it as both a user-facing line and a log record. The user line and
//! the record are independent side effects of the same catch site; a drill
//! never terminates the session.

use thiserror::Error;
use tracing::debug;

use crate::kind::ErrorKind;
use crate::record::ErrorRecord;
use crate::tabular::{self, TableError};

/// Drill location labels, as written into the log's 場所 column.
pub const LOCATION_NUMERIC: &str = "基本 - 数値入力";
pub const LOCATION_LIST: &str = "基本 - リスト取得";
pub const LOCATION_DIVISION: &str = "計算 - 割り算";
pub const LOCATION_PROFIT: &str = "計算 - 利益計算";
pub const LOCATION_FILE: &str = "ファイル - CSV読み込み";

/// Fixed 5-item reference list for the pick drill.
pub const REFERENCE_ITEMS: [&str; 5] = ["りんご", "バナナ", "みかん", "ぶどう", "いちご"];

/// Highest index the pick drill's input layer nominally accepts. Indices
/// 5-10 pass input validation but always miss the 5-item list.
pub const PICK_INDEX_MAX: usize = 10;

/// One practice request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Parse text as an integer
    CheckNumber { input: String },
    /// Look up a position in the reference list
    PickItem { index: usize },
    /// Divide dividend by divisor
    Divide { dividend: f64, divisor: f64 },
    /// Parse three money fields and compute the profit of a sale
    Profit {
        sales: String,
        cost: String,
        fee: String,
    },
    /// Parse uploaded bytes as a comma-separated table
    LoadTable { name: String, bytes: Vec<u8> },
}

/// What a drill failed with. The display string is the log message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillError {
    #[error("数字以外が入力されました")]
    InvalidNumber,

    #[error("リストの範囲外")]
    IndexOutOfRange { index: usize },

    #[error("ゼロ除算")]
    DivisionByZero,

    #[error("販売価格は0より大きい必要があります")]
    SalePriceNotPositive,

    #[error("仕入れ価格は0以上である必要があります")]
    CostPriceNegative,

    #[error("手数料率は0〜100の範囲で入力してください")]
    FeeRateOutOfBounds,

    #[error("空のファイル")]
    EmptyTable,

    #[error("CSVパースエラー")]
    MalformedTable,

    /// Catch-all; carries the underlying failure's own description
    #[error("{0}")]
    Unclassified(String),
}

impl DrillError {
    /// Symbolic category written into the log.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DrillError::InvalidNumber => ErrorKind::InvalidNumericInput,
            DrillError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            DrillError::DivisionByZero => ErrorKind::DivisionByZero,
            DrillError::SalePriceNotPositive
            | DrillError::CostPriceNegative
            | DrillError::FeeRateOutOfBounds => ErrorKind::DomainValidationFailure,
            DrillError::EmptyTable => ErrorKind::EmptyTabularInput,
            DrillError::MalformedTable => ErrorKind::MalformedTabularInput,
            DrillError::Unclassified(_) => ErrorKind::Unclassified,
        }
    }

    /// Short line shown to the user at the catch site.
    pub fn user_line(&self) -> String {
        match self {
            DrillError::InvalidNumber => "エラー: 数字を入力してください".to_string(),
            DrillError::IndexOutOfRange { index } => {
                format!("エラー: 番号{index}は範囲外です（0-4を入力してください）")
            }
            DrillError::DivisionByZero => "エラー: 0で割ることはできません".to_string(),
            DrillError::SalePriceNotPositive
            | DrillError::CostPriceNegative
            | DrillError::FeeRateOutOfBounds => format!("入力エラー: {self}"),
            DrillError::EmptyTable => "エラー: ファイルが空です".to_string(),
            DrillError::MalformedTable => {
                "エラー: CSVファイルの形式が正しくありません".to_string()
            }
            DrillError::Unclassified(_) => format!("予期しないエラー: {self}"),
        }
    }

    /// One-line remediation hint, where the drill has one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DrillError::DivisionByZero => Some("ヒント: 「割る数」を0以外の数字にしてください"),
            DrillError::MalformedTable => {
                Some("ヒント: Excelファイルの場合は「CSV UTF-8」形式で保存してください")
            }
            _ => None,
        }
    }
}

/// Result of one drill: what to show, and what to log.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Whether the operation succeeded
    pub ok: bool,
    /// Primary line shown to the user
    pub headline: String,
    /// Remediation hint, failure cases only
    pub hint: Option<String>,
    /// Extra lines (metrics, table preview)
    pub details: Vec<String>,
    /// Log entry for a caught failure, ready to append
    pub record: Option<ErrorRecord>,
}

impl Outcome {
    fn success(headline: impl Into<String>) -> Self {
        Self {
            ok: true,
            headline: headline.into(),
            hint: None,
            details: Vec::new(),
            record: None,
        }
    }

    fn failure(location: &str, input_value: impl Into<String>, err: &DrillError) -> Self {
        Self {
            ok: false,
            headline: err.user_line(),
            hint: err.hint().map(str::to_string),
            details: Vec::new(),
            record: Some(ErrorRecord::capture(
                location,
                err.kind(),
                input_value,
                err.to_string(),
            )),
        }
    }

    fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Fold a failure outside the closed categories (an unreadable upload, say)
/// into an outcome, keeping its own description as the message.
pub fn unclassified_failure(
    location: &str,
    input_value: impl Into<String>,
    description: impl Into<String>,
) -> Outcome {
    Outcome::failure(
        location,
        input_value,
        &DrillError::Unclassified(description.into()),
    )
}

/// Run one drill to completion. Failures are caught here and folded into the
/// outcome; this function never propagates them.
pub fn handle(action: Action) -> Outcome {
    match action {
        Action::CheckNumber { input } => check_number(&input),
        Action::PickItem { index } => pick_item(index),
        Action::Divide { dividend, divisor } => divide(dividend, divisor),
        Action::Profit { sales, cost, fee } => profit(&sales, &cost, &fee),
        Action::LoadTable { name, bytes } => load_table(&name, &bytes),
    }
}

fn check_number(input: &str) -> Outcome {
    match input.trim().parse::<i64>() {
        Ok(n) => Outcome::success(format!("正しい数字です: {n}")),
        Err(_) => Outcome::failure(LOCATION_NUMERIC, input, &DrillError::InvalidNumber),
    }
}

fn pick_item(index: usize) -> Outcome {
    match REFERENCE_ITEMS.get(index) {
        Some(item) => Outcome::success(format!("取得成功: {item}")),
        None => Outcome::failure(
            LOCATION_LIST,
            index.to_string(),
            &DrillError::IndexOutOfRange { index },
        ),
    }
}

fn divide(dividend: f64, divisor: f64) -> Outcome {
    if divisor == 0.0 {
        return Outcome::failure(
            LOCATION_DIVISION,
            format!("{dividend} ÷ {divisor}"),
            &DrillError::DivisionByZero,
        );
    }
    let result = dividend / divisor;
    Outcome::success(format!("結果: {dividend} ÷ {divisor} = {result}"))
}

fn profit(sales_raw: &str, cost_raw: &str, fee_raw: &str) -> Outcome {
    let input_value = format!("販売:{sales_raw}, 仕入:{cost_raw}, 手数料:{fee_raw}");

    let (sales, cost, fee) = match parse_profit_inputs(sales_raw, cost_raw, fee_raw) {
        Ok(values) => values,
        Err(err) => return Outcome::failure(LOCATION_PROFIT, input_value, &err),
    };
    if let Err(err) = validate_profit_inputs(sales, cost, fee) {
        return Outcome::failure(LOCATION_PROFIT, input_value, &err);
    }

    let fee_amount = sales * (fee / 100.0);
    let profit = sales - cost - fee_amount;
    let profit_rate = profit / sales * 100.0;

    Outcome::success("計算成功！").with_details(vec![
        format!("販売価格: ¥{sales:.0}"),
        format!("仕入れ価格: ¥{cost:.0}"),
        format!("手数料: ¥{fee_amount:.0}"),
        format!("利益: ¥{profit:.0} ({profit_rate:.1}%)"),
    ])
}

fn parse_profit_inputs(
    sales: &str,
    cost: &str,
    fee: &str,
) -> Result<(f64, f64, f64), DrillError> {
    let parse = |raw: &str| {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| DrillError::InvalidNumber)
    };
    Ok((parse(sales)?, parse(cost)?, parse(fee)?))
}

fn validate_profit_inputs(sales: f64, cost: f64, fee: f64) -> Result<(), DrillError> {
    if sales <= 0.0 {
        return Err(DrillError::SalePriceNotPositive);
    }
    if cost < 0.0 {
        return Err(DrillError::CostPriceNegative);
    }
    if !(0.0..=100.0).contains(&fee) {
        return Err(DrillError::FeeRateOutOfBounds);
    }
    Ok(())
}

fn load_table(name: &str, bytes: &[u8]) -> Outcome {
    match tabular::parse_csv(bytes) {
        Ok(table) => {
            let mut details = vec![format!(
                "行数: {}, 列数: {}",
                table.row_count(),
                table.column_count()
            )];
            details.push(table.header.join(" | "));
            for row in table.rows.iter().take(10) {
                details.push(row.join(" | "));
            }
            Outcome::success("ファイル読み込み成功！").with_details(details)
        }
        Err(TableError::Empty) => Outcome::failure(LOCATION_FILE, name, &DrillError::EmptyTable),
        Err(TableError::Malformed(reason)) => {
            debug!(%reason, "table rejected");
            Outcome::failure(LOCATION_FILE, name, &DrillError::MalformedTable)
        }
    }
}
