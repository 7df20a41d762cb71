use super::*;

#[test]
fn start_fills_missing_fields_with_empty_strings() {
    assert_eq!(
        OperatorCommand::parse("start 0 10").expect("parse"),
        OperatorCommand::StartDuration {
            hours: "0".into(),
            minutes: "10".into(),
            seconds: String::new(),
        }
    );
    assert_eq!(
        OperatorCommand::parse("CLOCK 14 30 0").expect("parse"),
        OperatorCommand::StartClock {
            hours: "14".into(),
            minutes: "30".into(),
            seconds: "0".into(),
        }
    );
    assert!(OperatorCommand::parse("start 1 2 3 4").is_err());
}

#[test]
fn mission_and_source_keep_the_rest_of_the_line() {
    assert_eq!(
        OperatorCommand::parse("mission  Starlink Group 6-12 ").expect("parse"),
        OperatorCommand::Mission("Starlink Group 6-12".into())
    );
    assert_eq!(
        OperatorCommand::parse("source https://x.test/pub?output=csv").expect("parse"),
        OperatorCommand::Source("https://x.test/pub?output=csv".into())
    );
    assert_eq!(
        OperatorCommand::parse("mission").expect("parse"),
        OperatorCommand::Mission(String::new())
    );
}

#[test]
fn manual_statuses_accept_board_values_only() {
    assert_eq!(
        OperatorCommand::parse("set weather no go").expect("parse"),
        OperatorCommand::SetManual(StatusField::Weather, StatusToken::NoGo)
    );
    assert_eq!(
        OperatorCommand::parse("set range n/a").expect("parse"),
        OperatorCommand::SetManual(StatusField::Range, StatusToken::NotAvailable)
    );
    assert!(OperatorCommand::parse("set range maybe").is_err());
    assert!(OperatorCommand::parse("set range error").is_err());
    assert!(OperatorCommand::parse("set pad GO").is_err());
    assert_eq!(
        OperatorCommand::parse("toggle vehicle").expect("parse"),
        OperatorCommand::Toggle(StatusField::Vehicle)
    );
}

#[test]
fn mode_cells_and_auto_holds() {
    assert_eq!(
        OperatorCommand::parse("mode buttons").expect("parse"),
        OperatorCommand::Mode(SourceMode::Buttons)
    );
    assert!(OperatorCommand::parse("mode radio").is_err());
    assert_eq!(
        OperatorCommand::parse("cells B2 B3 B4").expect("parse"),
        OperatorCommand::Cells {
            range: "B2".into(),
            weather: "B3".into(),
            vehicle: "B4".into(),
        }
    );
    assert_eq!(
        OperatorCommand::parse("auto-holds 600, 60 10").expect("parse"),
        OperatorCommand::AutoHolds(vec![600, 60, 10])
    );
    assert!(OperatorCommand::parse("auto-holds soon").is_err());
}

#[test]
fn blank_and_unknown_lines_are_errors() {
    assert!(OperatorCommand::parse("   ").is_err());
    assert!(OperatorCommand::parse("launch").is_err());
    assert_eq!(OperatorCommand::parse("exit"), Ok(OperatorCommand::Quit));
}
