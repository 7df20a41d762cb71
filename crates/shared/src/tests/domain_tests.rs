use super::*;

#[test]
fn normalizes_no_go_variants() {
    for raw in ["NO-GO", "no go", " NoGo ", "NO_GO"] {
        assert_eq!(StatusToken::normalize(raw), StatusToken::NoGo, "{raw}");
    }
}

#[test]
fn normalizes_go_and_unknown_values() {
    assert_eq!(StatusToken::normalize(" go\n"), StatusToken::Go);
    assert_eq!(StatusToken::normalize("Error"), StatusToken::Error);
    assert_eq!(StatusToken::normalize(""), StatusToken::NotAvailable);
    assert_eq!(StatusToken::normalize("N/A"), StatusToken::NotAvailable);
    assert_eq!(StatusToken::normalize("pending"), StatusToken::NotAvailable);
}

#[test]
fn toggling_sends_anything_but_go_to_go() {
    assert_eq!(StatusToken::Go.toggled(), StatusToken::NoGo);
    assert_eq!(StatusToken::NoGo.toggled(), StatusToken::Go);
    assert_eq!(StatusToken::NotAvailable.toggled(), StatusToken::Go);
    assert_eq!(StatusToken::Error.toggled(), StatusToken::Go);
}

#[test]
fn tokens_serialize_as_display_strings() {
    let triple = StatusTriple::new(StatusToken::Go, StatusToken::NoGo, StatusToken::NotAvailable);
    let json = serde_json::to_string(&triple).expect("serialize");
    assert_eq!(json, r#"{"range":"GO","weather":"NO-GO","vehicle":"N/A"}"#);

    let back: StatusTriple = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, triple);
}

#[test]
fn triple_field_access_matches_field() {
    let mut triple = StatusTriple::unavailable();
    triple.set(StatusField::Weather, StatusToken::Go);
    assert_eq!(triple.get(StatusField::Weather), StatusToken::Go);
    assert_eq!(triple.get(StatusField::Range), StatusToken::NotAvailable);
    assert_eq!(StatusTriple::error().vehicle, StatusToken::Error);
}

#[test]
fn parses_source_mode_aliases() {
    assert_eq!(SourceMode::parse("Buttons"), Some(SourceMode::Buttons));
    assert_eq!(SourceMode::parse("sheet"), Some(SourceMode::Spreadsheet));
    assert_eq!(SourceMode::parse("carrier pigeon"), None);
}

#[test]
fn manual_values_accept_board_tokens_only() {
    assert_eq!(StatusToken::parse_manual("go"), Some(StatusToken::Go));
    assert_eq!(StatusToken::parse_manual("No Go"), Some(StatusToken::NoGo));
    assert_eq!(StatusToken::parse_manual("n/a"), Some(StatusToken::NotAvailable));
    assert_eq!(StatusToken::parse_manual("maybe"), None);
    assert_eq!(StatusToken::parse_manual("ERROR"), None);
    assert_eq!(StatusToken::parse_manual(""), None);
}
