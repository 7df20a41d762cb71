use std::fs;

use super::*;
use chrono::{TimeDelta, TimeZone};
use countdown::Phase;
use crossbeam_channel::{bounded, Receiver};
use shared::domain::{StatusField, StatusToken};
use tempfile::TempDir;

struct Harness {
    controller: Controller,
    poller_rx: Receiver<PollerCommand>,
    _dir: TempDir,
}

fn harness(settings: Settings) -> Harness {
    let dir = TempDir::new().expect("tempdir");
    let store = SettingsStore::in_dir(dir.path());
    store.save(&settings).expect("seed settings");
    let writer = OverlayWriter::new(dir.path());
    let (poller_tx, poller_rx) = bounded(16);
    Harness {
        controller: Controller::new(settings, store, writer, poller_tx),
        poller_rx,
        _dir: dir,
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid time")
}

fn countdown_html(h: &Harness) -> String {
    fs::read_to_string(h.controller.writer().countdown_path()).expect("countdown page")
}

fn gonogo_html(h: &Harness) -> String {
    fs::read_to_string(h.controller.writer().gonogo_path()).expect("gonogo page")
}

fn start(h: &mut Harness, secs: &str, now: DateTime<Utc>) {
    let flow = h.controller.handle_operator(
        OperatorCommand::StartDuration {
            hours: "0".into(),
            minutes: "0".into(),
            seconds: secs.into(),
        },
        now,
    );
    assert_eq!(flow, Flow::Continue);
}

#[test]
fn tick_writes_countdown_page_with_mission() {
    let mut settings = Settings::default();
    settings.mission_name = "Artemis II".into();
    let mut h = harness(settings);

    start(&mut h, "10", t0());
    h.controller.tick(t0() + TimeDelta::seconds(3));

    let html = countdown_html(&h);
    assert!(html.contains("T-00:00:07"), "{html}");
    assert!(html.contains("Artemis II"));
}

#[test]
fn invalid_start_shows_invalid_time() {
    let mut h = harness(Settings::default());
    start(&mut h, "ten", t0());
    h.controller.tick(t0());

    assert_eq!(h.controller.countdown().phase(), Phase::Idle);
    assert!(countdown_html(&h).contains("Invalid time"));
}

#[test]
fn hold_and_resume_report_when_nothing_to_do() {
    let mut h = harness(Settings::default());

    h.controller.handle_operator(OperatorCommand::Hold, t0());
    assert_eq!(h.controller.take_status().as_deref(), Some("Nothing to hold"));

    start(&mut h, "30", t0());
    h.controller.take_status();
    h.controller
        .handle_operator(OperatorCommand::Hold, t0() + TimeDelta::seconds(5));
    assert!(h.controller.countdown().is_holding());
    h.controller.tick(t0() + TimeDelta::seconds(9));
    assert!(countdown_html(&h).contains("H+00:00:04"));

    h.controller
        .handle_operator(OperatorCommand::Resume, t0() + TimeDelta::seconds(20));
    h.controller.tick(t0() + TimeDelta::seconds(21));
    assert!(countdown_html(&h).contains("T-00:00:24"));
}

#[test]
fn mission_changes_are_persisted() {
    let mut h = harness(Settings::default());
    h.controller
        .handle_operator(OperatorCommand::Mission("Crew-9".into()), t0());
    h.controller
        .handle_operator(OperatorCommand::HideMission(true), t0());

    let stored = SettingsStore::in_dir(h.controller.writer().dir())
        .try_load()
        .expect("stored settings");
    assert_eq!(stored.mission_name, "Crew-9");
    assert!(stored.hide_mission_name);

    h.controller.tick(t0());
    assert!(!countdown_html(&h).contains("Crew-9"));
}

#[test]
fn buttons_mode_shows_manual_statuses_and_pauses_polling() {
    let mut h = harness(Settings::default());
    h.controller
        .handle_operator(OperatorCommand::Mode(SourceMode::Buttons), t0());
    assert_eq!(h.poller_rx.try_recv(), Ok(PollerCommand::Pause));

    h.controller
        .handle_operator(OperatorCommand::Toggle(StatusField::Range), t0());
    h.controller.handle_operator(
        OperatorCommand::SetManual(StatusField::Weather, StatusToken::NoGo),
        t0(),
    );
    h.controller.tick(t0());

    let html = gonogo_html(&h);
    assert!(html.contains("Range: GO"), "{html}");
    assert!(html.contains("Weather: NO-GO"));
    assert!(html.contains("Vehicle: N/A"));

    let stored = SettingsStore::in_dir(h.controller.writer().dir())
        .try_load()
        .expect("stored settings");
    assert_eq!(stored.mode, SourceMode::Buttons);
    assert_eq!(stored.manual_range, StatusToken::Go);
}

#[test]
fn sheet_statuses_and_fallback_drive_the_board() {
    let mut h = harness(Settings::default());
    h.controller.handle_event(UiEvent::Statuses(StatusTriple::new(
        StatusToken::Go,
        StatusToken::Go,
        StatusToken::NoGo,
    )));
    h.controller.tick(t0());
    assert!(gonogo_html(&h).contains("Vehicle: NO-GO"));

    h.controller.handle_event(UiEvent::FallbackEngaged {
        embed_url: "https://docs.example/pubhtml".into(),
    });
    assert_eq!(
        h.controller.board(),
        Board::Embedded("https://docs.example/pubhtml".into())
    );
    h.controller.tick(t0() + TimeDelta::seconds(1));
    assert!(gonogo_html(&h).contains("<iframe id=\"sheet\""));

    h.controller.handle_event(UiEvent::FallbackCleared);
    h.controller.tick(t0() + TimeDelta::seconds(2));
    assert!(!gonogo_html(&h).contains("<iframe"));
}

#[test]
fn source_change_reconfigures_poller_with_settings_cells() {
    let mut h = harness(Settings::default());
    h.controller.handle_operator(
        OperatorCommand::Cells {
            range: "B2".into(),
            weather: "B3".into(),
            vehicle: "B4".into(),
        },
        t0(),
    );
    h.controller.handle_operator(
        OperatorCommand::Source("https://docs.example/pub?output=csv".into()),
        t0(),
    );

    let _ = h.poller_rx.try_recv();
    match h.poller_rx.try_recv() {
        Ok(PollerCommand::Reconfigure(source)) => {
            assert_eq!(source.url, "https://docs.example/pub?output=csv");
            assert_eq!(source.cells.range, "B2");
            assert_eq!(source.embed_url(), "https://docs.example/pub?output=html");
        }
        other => panic!("expected reconfigure, got {other:?}"),
    }
}

#[test]
fn auto_holds_apply_to_the_running_countdown() {
    let mut h = harness(Settings::default());
    h.controller
        .handle_operator(OperatorCommand::AutoHolds(vec![5]), t0());
    start(&mut h, "10", t0());
    h.controller.tick(t0() + TimeDelta::seconds(5));

    assert!(h.controller.countdown().is_holding());
    assert_eq!(h.controller.settings().auto_hold_times, vec![5]);
}

#[test]
fn quit_shuts_the_poller_down() {
    let mut h = harness(Settings::default());
    assert_eq!(
        h.controller.handle_operator(OperatorCommand::Quit, t0()),
        Flow::Quit
    );
    assert_eq!(h.poller_rx.try_recv(), Ok(PollerCommand::Shutdown));
}

#[test]
fn disconnected_poller_is_reported_not_fatal() {
    let mut h = harness(Settings::default());
    drop(h.poller_rx);
    h.poller_rx = bounded(1).1;

    h.controller.handle_operator(OperatorCommand::Refresh, t0());
    let status = h.controller.take_status().expect("status");
    assert!(status.contains("not running"), "{status}");
}

#[test]
fn fallback_without_a_link_keeps_the_status_board() {
    let mut h = harness(Settings::default());
    h.controller.handle_event(UiEvent::Statuses(StatusTriple::error()));
    h.controller.handle_event(UiEvent::FallbackEngaged {
        embed_url: String::new(),
    });

    assert_eq!(h.controller.board(), Board::Statuses(StatusTriple::error()));
}

#[test]
fn quit_still_exits_when_the_poller_queue_is_full() {
    let mut h = harness(Settings::default());
    while h.poller_rx.len() < 16 {
        h.controller.handle_operator(OperatorCommand::Refresh, t0());
    }
    h.controller.take_status();

    assert_eq!(
        h.controller.handle_operator(OperatorCommand::Quit, t0()),
        Flow::Quit
    );
    assert!(h.controller.take_status().is_some_and(|s| s.contains("full")));

    drop(h.controller);
    let queued: Vec<_> = h.poller_rx.try_iter().collect();
    assert_eq!(queued.len(), 16);
    assert!(h.poller_rx.recv().is_err());
}
