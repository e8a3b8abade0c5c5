//! End-to-end flows over one practice session: drills feed the log, the log
//! exports to a file a spreadsheet can read back.

use chrono::NaiveDate;
use dojo_common::{
    export_csv, parse_csv, sample_csv, Action, Session, LOCATION_DIVISION, LOCATION_LIST,
    LOCATION_NUMERIC, LOG_HEADER, UTF8_BOM,
};

fn export_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

#[test]
fn a_full_practice_run_accumulates_and_exports() {
    let mut session = Session::new();

    // two failures, two successes, one more failure
    session.dispatch(Action::CheckNumber {
        input: "abc".to_string(),
    });
    session.dispatch(Action::PickItem { index: 7 });
    session.dispatch(Action::CheckNumber {
        input: "100".to_string(),
    });
    session.dispatch(Action::Divide {
        dividend: 100.0,
        divisor: 10.0,
    });
    session.dispatch(Action::Divide {
        dividend: 100.0,
        divisor: 0.0,
    });

    let all = session.store().read_all();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].location, LOCATION_NUMERIC);
    assert_eq!(all[1].location, LOCATION_LIST);
    assert_eq!(all[2].location, LOCATION_DIVISION);

    let (filename, bytes) = session.export_log(export_date()).unwrap();
    assert_eq!(filename, "error_log_20250601.csv");

    // the exported file reads back field-for-field
    let table = parse_csv(&bytes).unwrap();
    assert_eq!(table.header, LOG_HEADER);
    assert_eq!(table.row_count(), 3);
    for (row, record) in table.rows.iter().zip(all) {
        assert_eq!(row[0], record.timestamp);
        assert_eq!(row[1], record.location);
        assert_eq!(row[2], record.error_kind);
        assert_eq!(row[3], record.input_value);
        assert_eq!(row[4], record.message);
    }

    session.clear_log();
    assert!(session.export_log(export_date()).is_none());
}

#[test]
fn export_round_trips_awkward_field_content() {
    let mut session = Session::new();
    // composite input value carries commas; the quoting has to survive a
    // write-to-disk round trip
    session.dispatch(Action::Profit {
        sales: "0".to_string(),
        cost: "700".to_string(),
        fee: "10".to_string(),
    });

    let (filename, bytes) = session.export_log(export_date()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(filename);
    std::fs::write(&path, &bytes).unwrap();

    let reread = std::fs::read(&path).unwrap();
    assert!(reread.starts_with(&UTF8_BOM));

    let table = parse_csv(&reread).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.rows[0][3], "販売:0, 仕入:700, 手数料:10");
    assert_eq!(table.rows[0][4], "販売価格は0より大きい必要があります");
}

#[test]
fn export_bytes_are_stable_across_calls() {
    let mut session = Session::new();
    session.dispatch(Action::PickItem { index: 9 });

    let first = session.export_log(export_date()).unwrap().1;
    let second = session.export_log(export_date()).unwrap().1;
    assert_eq!(first, second);
}

#[test]
fn log_csv_and_direct_export_agree() {
    let mut session = Session::new();
    session.dispatch(Action::CheckNumber {
        input: "x".to_string(),
    });

    let via_session = session.export_log(export_date()).unwrap().1;
    let direct = export_csv(session.store().read_all());
    assert_eq!(via_session, direct);
}

#[test]
fn the_sample_table_feeds_the_load_drill() {
    let mut session = Session::new();
    let outcome = session.dispatch(Action::LoadTable {
        name: "sample.csv".to_string(),
        bytes: sample_csv(),
    });

    assert!(outcome.ok);
    assert!(session.store().is_empty());
}

#[test]
fn two_sessions_never_share_a_log() {
    let mut teaching = Session::new();
    let mut observing = Session::new();

    teaching.dispatch(Action::Divide {
        dividend: 1.0,
        divisor: 0.0,
    });

    assert_eq!(teaching.store().len(), 1);
    assert!(observing.store().is_empty());
    assert!(observing.export_log(export_date()).is_none());

    observing.dispatch(Action::PickItem { index: 10 });
    assert_eq!(teaching.store().len(), 1);
    assert_eq!(observing.store().len(), 1);
}
