// tests/check_run_tests.rs
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};
use tokio::time::Duration;
use uptime_probe::commit::{CommitSink, SignalError, StepOutput};
use uptime_probe::health::{Prober, StatusRecord};
use uptime_probe::notify::{Notifier, NotifyError};
use uptime_probe::runner::{run_check, summary, Outcome, FATAL_EXIT_CODE};
use uptime_probe::state::{FileStateStore, MemoryStateStore, StateStore};
use url::Url;

type EventLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    events: EventLog,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push("notify".to_string());
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            return Err(NotifyError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

#[derive(Default)]
struct RecordingSink {
    events: EventLog,
}

#[async_trait]
impl CommitSink for RecordingSink {
    async fn emit(&self, should_commit: bool) -> Result<(), SignalError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("should_commit={}", should_commit));
        Ok(())
    }
}

fn previous(ok: bool) -> StatusRecord {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    if ok {
        StatusRecord::from_response("https://test.example.com/up", 200, 150, at)
    } else {
        StatusRecord::from_response("https://test.example.com/up", 500, 1000, at)
    }
}

async fn target(status: usize) -> (mockito::ServerGuard, Prober) {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/up")
        .with_status(status)
        .create_async()
        .await;
    let url = Url::parse(&format!("{}/up", server.url())).unwrap();
    let prober = Prober::new(url, Duration::from_secs(5)).unwrap();
    (server, prober)
}

fn unreachable_prober() -> Prober {
    Prober::new(Url::parse("http://127.0.0.1:1/up").unwrap(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_healthy_first_run_commits() {
    let (_server, prober) = target(200).await;
    let store = MemoryStateStore::new();
    let notifier = RecordingNotifier::default();

    let report = run_check(&prober, &store, &RecordingSink::default(), &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::Healthy);
    assert!(report.should_commit);
    assert!(notifier.sent().is_empty());
    assert_eq!(store.current().await, Some(report.record.clone()));
    assert!(summary(&report).starts_with("OK 200 in "));
}

#[tokio::test]
async fn test_healthy_after_healthy_does_not_commit() {
    let (_server, prober) = target(200).await;
    let store = MemoryStateStore::with_record(previous(true));
    let notifier = RecordingNotifier::default();

    let report = run_check(&prober, &store, &RecordingSink::default(), &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::Healthy);
    assert!(!report.should_commit);
    // The stored record is still refreshed.
    assert_ne!(store.current().await, Some(previous(true)));
}

#[tokio::test]
async fn test_recovery_commits() {
    let (_server, prober) = target(200).await;
    let store = MemoryStateStore::with_record(previous(false));
    let notifier = RecordingNotifier::default();

    let report = run_check(&prober, &store, &RecordingSink::default(), &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::Healthy);
    assert!(report.should_commit);
}

#[tokio::test]
async fn test_still_down_commits_and_alerts() {
    let (_server, prober) = target(500).await;
    let store = MemoryStateStore::with_record(previous(false));
    let notifier = RecordingNotifier::default();

    let report = run_check(&prober, &store, &RecordingSink::default(), &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::DownAlerted);
    assert_eq!(report.outcome.exit_code(), 2);
    assert!(report.should_commit);
    assert_eq!(report.record.status_code, Some(500));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].0.contains("DOWN"));
    assert!(sent[0].0.contains("status=500"));
}

#[tokio::test]
async fn test_transport_failure_alerts() {
    let prober = unreachable_prober();
    let store = MemoryStateStore::with_record(previous(true));
    let notifier = RecordingNotifier::default();

    let report = run_check(&prober, &store, &RecordingSink::default(), &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::DownAlerted);
    assert!(report.should_commit);
    assert!(report.record.status_code.is_none());
    assert!(report.record.error.is_some());

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].0.contains("status=None"));
}

#[tokio::test]
async fn test_dispatch_failure_escalates_outcome() {
    let (_server, prober) = target(503).await;
    let store = MemoryStateStore::new();
    let notifier = RecordingNotifier::failing();

    let report = run_check(&prober, &store, &RecordingSink::default(), &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::DownAlertFailed);
    assert_eq!(report.outcome.exit_code(), 1);
    // State was written before the dispatch attempt.
    assert_eq!(store.current().await, Some(report.record.clone()));
}

#[tokio::test]
async fn test_file_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("docs/status.json"));
    let notifier = RecordingNotifier::default();
    let (_server, prober) = target(200).await;

    let first = run_check(&prober, &store, &RecordingSink::default(), &notifier).await.unwrap();
    let second = run_check(&prober, &store, &RecordingSink::default(), &notifier).await.unwrap();

    assert!(first.should_commit);
    assert!(!second.should_commit);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["ok"], true);
    assert_eq!(value["status"], 200);
    assert!(value["error"].is_null());
    assert_eq!(value["url"], prober.url().as_str());
    assert!(value["checked_at"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_unwritable_state_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("docs");
    std::fs::write(&blocker, "file in the way").unwrap();
    let store = FileStateStore::new(blocker.join("status.json"));
    let notifier = RecordingNotifier::default();
    let prober = unreachable_prober();

    assert!(run_check(&prober, &store, &RecordingSink::default(), &notifier).await.is_err());
    assert!(notifier.sent().is_empty());
    assert!(store.read_previous().await.is_none());
}

#[tokio::test]
async fn test_signal_is_emitted_before_alert() {
    let (_server, prober) = target(500).await;
    let store = MemoryStateStore::with_record(previous(true));
    let events = EventLog::default();
    let sink = RecordingSink {
        events: events.clone(),
    };
    let notifier = RecordingNotifier {
        events: events.clone(),
        ..Default::default()
    };

    let report = run_check(&prober, &store, &sink, &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::DownAlerted);
    assert_eq!(
        *events.lock().unwrap(),
        vec!["should_commit=true".to_string(), "notify".to_string()]
    );
}

#[tokio::test]
async fn test_undeliverable_signal_still_alerts() {
    let dir = tempfile::tempdir().unwrap();
    let sink = StepOutput::new(Some(dir.path().join("missing/github_output")));
    let (_server, prober) = target(500).await;
    let store = MemoryStateStore::new();
    let notifier = RecordingNotifier::default();

    let report = run_check(&prober, &store, &sink, &notifier).await.unwrap();

    assert!(!report.signal_delivered);
    assert_eq!(report.outcome, Outcome::DownAlerted);
    assert_eq!(report.exit_code(), FATAL_EXIT_CODE);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_signal_written_to_step_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("github_output");
    let sink = StepOutput::new(Some(output.clone()));
    let (_server, prober) = target(200).await;
    let store = MemoryStateStore::with_record(previous(true));
    let notifier = RecordingNotifier::default();

    let report = run_check(&prober, &store, &sink, &notifier).await.unwrap();

    assert!(report.signal_delivered);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "should_commit=false\n");
}
