// tests/notifier_timing.rs

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use merlion_client::notifier::{spawn_notifier, Notice};
use merlion_client::{ClientConfig, SequencePolicy, TableClient};
use serde_json::json;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;

type Timeline = Vec<(&'static str, Duration)>;

fn stamp(label: &'static str, start: Instant, hold_ms: u64) -> Notice<Timeline> {
    Notice::new(
        move |timeline: &mut Timeline| timeline.push((label, start.elapsed())),
        Duration::from_millis(hold_ms),
    )
}

/// The paused clock jumps straight to timer deadlines, give or take a tick.
fn assert_at(actual: Duration, expected_ms: u64) {
    let expected = Duration::from_millis(expected_ms);
    assert!(
        actual >= expected && actual < expected + Duration::from_millis(5),
        "expected ~{:?}, got {:?}",
        expected,
        actual
    );
}

#[tokio::test(start_paused = true)]
async fn test_sequence_runs_back_to_back() {
    let timeline = Arc::new(Mutex::new(Vec::new()));
    let (handle, worker) = spawn_notifier(timeline.clone(), SequencePolicy::Queue);
    let start = Instant::now();

    handle
        .enqueue_sequence(vec![
            stamp("A", start, 1000),
            stamp("B", start, 500),
            stamp("C", start, 0),
        ])
        .unwrap();
    drop(handle);
    worker.await.unwrap();

    let timeline = timeline.lock().await;
    let labels: Vec<&str> = timeline.iter().map(|(label, _)| *label).collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
    assert_at(timeline[0].1, 0);
    assert_at(timeline[1].1, 1000);
    assert_at(timeline[2].1, 1500);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_sequences_queue_up() {
    let timeline = Arc::new(Mutex::new(Vec::new()));
    let (handle, worker) = spawn_notifier(timeline.clone(), SequencePolicy::Queue);
    let start = Instant::now();

    handle
        .enqueue_sequence(vec![stamp("A", start, 1000), stamp("B", start, 0)])
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    handle
        .enqueue_sequence(vec![stamp("C", start, 0)])
        .unwrap();
    drop(handle);
    worker.await.unwrap();

    let timeline = timeline.lock().await;
    let labels: Vec<&str> = timeline.iter().map(|(label, _)| *label).collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
    assert_at(timeline[1].1, 1000);
    assert_at(timeline[2].1, 1000);
}

#[tokio::test(start_paused = true)]
async fn test_preempt_cuts_running_sequence() {
    let timeline = Arc::new(Mutex::new(Vec::new()));
    let (handle, worker) = spawn_notifier(timeline.clone(), SequencePolicy::Preempt);
    let start = Instant::now();

    handle
        .enqueue_sequence(vec![stamp("A", start, 1000), stamp("B", start, 0)])
        .unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    handle
        .enqueue_sequence(vec![stamp("C", start, 0)])
        .unwrap();
    drop(handle);
    worker.await.unwrap();

    let timeline = timeline.lock().await;
    let labels: Vec<&str> = timeline.iter().map(|(label, _)| *label).collect();
    assert_eq!(labels, vec!["A", "C"]);
    assert_at(timeline[1].1, 300);
}

#[tokio::test(start_paused = true)]
async fn test_hand_finished_shows_winner_then_clears() {
    let (outbound, _sent) = mpsc::unbounded_channel();
    let client = TableClient::new(ClientConfig::default(), outbound);
    let start = Instant::now();

    let statuses = Arc::new(StdMutex::new(Vec::new()));
    let sink = statuses.clone();
    client
        .table()
        .lock()
        .await
        .subscribe_board(move |board, _| {
            sink.lock()
                .unwrap()
                .push((board.status.clone(), start.elapsed()))
        });

    let join = json!({
        "event": "join",
        "data": {
            "table_id": 1,
            "players": [
                {"seat": 0, "name": "Alice"},
                {"seat": 1, "name": "Bob"},
                {"seat": 2, "name": "Player@seat2"}
            ]
        }
    });
    client.handle_text(&join.to_string()).await.unwrap();
    statuses.lock().unwrap().clear();

    let finished = json!({
        "event": "hand_finished",
        "data": {"winners": [[2, 50, ["Ah", "Kd"], "pair of aces"]]}
    });
    client.handle_text(&finished.to_string()).await.unwrap();
    client.shutdown().await.unwrap();

    let statuses = statuses.lock().unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].0, "Player@seat2 wins $50 with AhKd (pair of aces)");
    assert_at(statuses[0].1, 0);
    assert_eq!(statuses[1].0, "");
    assert_at(statuses[1].1, 3000);
}

#[tokio::test(start_paused = true)]
async fn test_configured_winner_display_time() {
    let (outbound, _sent) = mpsc::unbounded_channel();
    let config = ClientConfig {
        winner_display_ms: 1200,
        ..ClientConfig::default()
    };
    let client = TableClient::new(config, outbound);
    let start = Instant::now();

    let cleared_at = Arc::new(StdMutex::new(None));
    let sink = cleared_at.clone();
    client
        .table()
        .lock()
        .await
        .subscribe_board(move |board, _| {
            if board.status.is_empty() {
                *sink.lock().unwrap() = Some(start.elapsed());
            }
        });

    let hand = json!({
        "event": "join",
        "data": {"table_id": "t1", "players": [{"seat": 0, "name": "Alice"}, {"seat": 1, "name": "Bob"}]}
    });
    client.handle_text(&hand.to_string()).await.unwrap();
    let finished = json!({
        "event": "hand_finished",
        "data": {"winners": [
            [0, 20, "QsQh", "pair of queens"],
            [1, 20, ["Qc", "Qd"], "pair of queens"]
        ]}
    });
    client.handle_text(&finished.to_string()).await.unwrap();
    client.shutdown().await.unwrap();

    let cleared_at = cleared_at.lock().unwrap().expect("status was never cleared");
    assert_at(cleared_at, 2400);
}
