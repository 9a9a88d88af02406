use std::time::Duration;

use tokio::io::BufReader;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use yomu_types::AppEvent;

use crate::io::{parse_command, watch_input};

fn lookup(line: &str) -> yomu_types::ContentUpdate {
    match parse_command(line) {
        Some(AppEvent::ContentUpdated(update)) => update,
        other => panic!("Expected content update, got {:?}", other),
    }
}

#[test]
fn commands_are_recognized() {
    assert!(matches!(parse_command(":click"), Some(AppEvent::ExplainClicked)));
    assert!(matches!(parse_command(" :explain "), Some(AppEvent::ExplainClicked)));
    assert!(matches!(parse_command(":clear"), Some(AppEvent::ContentCleared)));
    assert!(matches!(parse_command(":q"), Some(AppEvent::Shutdown)));
    assert!(parse_command(":bogus").is_none());
    assert!(parse_command("   ").is_none());
}

#[test]
fn plus_prefix_holds_shift() {
    let update = lookup("+走る | 毎朝公園を走る");
    assert_eq!(update.word, "走る");
    assert!(update.modifier_keys.contains("shift"));
    assert_eq!(update.sentence.map(|s| s.text).as_deref(), Some("毎朝公園を走る"));
}

#[test]
fn plain_word_has_no_modifiers_or_sentence() {
    let update = lookup("run");
    assert_eq!(update.word, "run");
    assert!(update.modifier_keys.is_empty());
    assert!(update.sentence.is_none());
}

#[test]
fn json_update_is_parsed() {
    let update = lookup(r#"{"word":"bank","modifier_keys":["Shift"],"sentence":{"text":"river bank"}}"#);
    assert_eq!(update.word, "bank");
    assert!(update.modifier_keys.contains("Shift"));
    assert_eq!(update.sentence.map(|s| s.text).as_deref(), Some("river bank"));

    assert!(parse_command("{not json").is_none());
}

#[test]
fn lone_plus_is_ignored() {
    assert!(parse_command("+").is_none());
    assert!(parse_command("+ | only context").is_none());
}

#[tokio::test]
async fn watch_input_forwards_events_and_shuts_down_at_eof() {
    let (tx, rx) = kanal::bounded_async::<AppEvent>(16);
    let input = BufReader::new(&b"+run | I run daily\n\n:click\n"[..]);

    timeout(
        Duration::from_secs(2),
        watch_input(input, tx, CancellationToken::new()),
    )
    .await
    .expect("watcher hung")
    .expect("watcher failed");

    assert!(matches!(rx.recv().await, Ok(AppEvent::ContentUpdated(u)) if u.word == "run"));
    assert!(matches!(rx.recv().await, Ok(AppEvent::ExplainClicked)));
    assert!(matches!(rx.recv().await, Ok(AppEvent::Shutdown)));
}

#[tokio::test]
async fn watch_input_stops_on_cancel() {
    let (tx, _rx) = kanal::bounded_async::<AppEvent>(16);
    let (_writer, reader) = tokio::io::duplex(64);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = timeout(
        Duration::from_secs(2),
        watch_input(BufReader::new(reader), tx, cancel),
    )
    .await
    .expect("watcher ignored cancellation");
    assert!(result.is_ok());
}
