//! Failure taxonomy reported by the practice drills.

use std::fmt;

/// Closed set of failure categories.
///
/// `Unclassified` is the explicit catch-all: the record built for it carries
/// the underlying failure's own description, never a runtime type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input text cannot be parsed as a number
    InvalidNumericInput,
    /// Requested position lies outside the reference list
    IndexOutOfRange,
    /// Divisor is zero
    DivisionByZero,
    /// A derived business-rule check failed
    DomainValidationFailure,
    /// Uploaded table contains no rows
    EmptyTabularInput,
    /// Uploaded bytes cannot be parsed as a table
    MalformedTabularInput,
    /// Anything the categories above do not cover
    Unclassified,
}

impl ErrorKind {
    /// Every category, in help-screen order.
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::InvalidNumericInput,
        ErrorKind::IndexOutOfRange,
        ErrorKind::DivisionByZero,
        ErrorKind::DomainValidationFailure,
        ErrorKind::EmptyTabularInput,
        ErrorKind::MalformedTabularInput,
        ErrorKind::Unclassified,
    ];

    /// Symbolic name, as written into the log's エラー column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidNumericInput => "invalid-numeric-input",
            ErrorKind::IndexOutOfRange => "index-out-of-range",
            ErrorKind::DivisionByZero => "division-by-zero",
            ErrorKind::DomainValidationFailure => "domain-validation-failure",
            ErrorKind::EmptyTabularInput => "empty-tabular-input",
            ErrorKind::MalformedTabularInput => "malformed-tabular-input",
            ErrorKind::Unclassified => "unclassified",
        }
    }

    /// One-line description for the help screen.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::InvalidNumericInput => "数値に変換できない入力",
            ErrorKind::IndexOutOfRange => "リストの範囲外アクセス",
            ErrorKind::DivisionByZero => "0で割ろうとした",
            ErrorKind::DomainValidationFailure => "業務ルール違反の値",
            ErrorKind::EmptyTabularInput => "空のテーブル入力",
            ErrorKind::MalformedTabularInput => "形式が不正なテーブル入力",
            ErrorKind::Unclassified => "その他の予期しないエラー",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbolic_names_are_kebab_case() {
        for kind in ErrorKind::ALL {
            let name = kind.as_str();
            assert!(!name.is_empty());
            assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '-'), "{name}");
        }
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(
            ErrorKind::DivisionByZero.to_string(),
            ErrorKind::DivisionByZero.as_str()
        );
    }
}
