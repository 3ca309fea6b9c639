use async_trait::async_trait;
use punchtracker::core::capture::{CaptureSession, CaptureState, CaptureTiming, Tick};
use punchtracker::core::location::{FixedLocation, LocationProvider, ScriptedLocation};
use punchtracker::core::permission::StaticPermission;
use punchtracker::core::tracker::CaptureService;
use punchtracker::errors::AppError;
use punchtracker::models::coordinates::Coordinates;
use punchtracker::store::PunchInStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

const CYCLE_MS: u64 = 600_000;

fn here() -> Coordinates {
    Coordinates::new(45.464203, 9.189982).unwrap()
}

fn there() -> Coordinates {
    Coordinates::new(41.902782, 12.496366).unwrap()
}

/// The first fix is instant, every later one takes `delay`.
struct SlowAfterFirst {
    delay: Duration,
    calls: AtomicU32,
}

impl SlowAfterFirst {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl LocationProvider for SlowAfterFirst {
    async fn last_known_location(&self) -> Option<Coordinates> {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            tokio::time::sleep(self.delay).await;
        }
        Some(here())
    }
}

fn active_session() -> CaptureSession {
    let mut session = CaptureSession::new(CaptureTiming::default());
    session.activate();
    session
}

// ---------------------------
// State machine
// ---------------------------

#[test]
fn test_idle_session_does_not_tick() {
    let mut session = CaptureSession::new(CaptureTiming::default());
    assert_eq!(session.tick(), Tick::Idle);
    assert_eq!(session.remaining_secs(), 600);
}

#[test]
fn test_activation_resets_countdown_and_counters() {
    let mut session = active_session();
    for _ in 0..100 {
        session.tick();
    }
    session.record_capture(here());

    session.activate();
    assert_eq!(session.state(), CaptureState::Active);
    assert_eq!(session.remaining_secs(), 600);
    assert!(!session.warning_shown());
    assert_eq!(session.capture_count(), 0);
}

#[test]
fn test_warning_fires_once_per_cycle() {
    let mut session = active_session();

    for cycle in 1..=3 {
        let mut warnings = 0;
        let mut due = 0;

        for _ in 0..600 {
            match session.tick() {
                Tick::Warning => {
                    warnings += 1;
                    assert_eq!(session.remaining_secs(), 60);
                    assert!(session.warning_shown());
                }
                Tick::CaptureDue => due += 1,
                Tick::Counting => {}
                Tick::Idle => panic!("active session reported idle"),
            }
        }

        assert_eq!(warnings, 1, "cycle {cycle}");
        assert_eq!(due, 1, "cycle {cycle}");
        // rollover clears the warning
        assert!(!session.warning_shown());
        assert_eq!(session.remaining_secs(), 600);
        assert_eq!(session.completed_cycles(), cycle);
    }
}

#[test]
fn test_warning_flag_stays_set_until_rollover() {
    let mut session = active_session();
    for _ in 0..540 {
        session.tick();
    }
    assert!(session.warning_shown());

    for _ in 0..59 {
        assert_eq!(session.tick(), Tick::Counting);
        assert!(session.warning_shown());
    }

    assert_eq!(session.tick(), Tick::CaptureDue);
    assert!(!session.warning_shown());
}

#[test]
fn test_deactivate_resets_count() {
    let mut session = active_session();
    session.record_capture(here());
    session.record_capture(there());
    assert_eq!(session.capture_count(), 2);
    assert_eq!(session.last_location(), Some(there()));

    session.deactivate();
    assert_eq!(session.state(), CaptureState::Idle);
    assert_eq!(session.capture_count(), 0);
    assert_eq!(session.tick(), Tick::Idle);
}

#[test]
fn test_handed_off_capture_counts_when_it_returns() {
    let mut session = active_session();

    session.capture_started();
    session.capture_started();
    assert_eq!(session.pending_captures(), 2);
    assert_eq!(session.capture_count(), 0);

    session.capture_finished(None);
    assert_eq!(session.pending_captures(), 1);
    assert_eq!(session.capture_count(), 0);

    session.capture_finished(Some(there()));
    assert_eq!(session.pending_captures(), 0);
    assert_eq!(session.capture_count(), 1);
    assert_eq!(session.last_location(), Some(there()));

    session.capture_started();
    session.deactivate();
    assert_eq!(session.pending_captures(), 0);
}

#[test]
fn test_custom_timing() {
    let timing = CaptureTiming {
        interval_secs: 5,
        warning_at_secs: 2,
    };
    let mut session = CaptureSession::new(timing);
    session.activate();

    let ticks: Vec<Tick> = (0..5).map(|_| session.tick()).collect();
    assert_eq!(
        ticks,
        vec![
            Tick::Counting,
            Tick::Counting,
            Tick::Warning,
            Tick::Counting,
            Tick::CaptureDue
        ]
    );
}

// ---------------------------
// Runner
// ---------------------------

#[tokio::test(start_paused = true)]
async fn test_start_captures_immediately() {
    let store = PunchInStore::in_memory().unwrap();
    let service = CaptureService::new(
        store.clone(),
        Arc::new(FixedLocation(here())),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::granted();

    let handle = service.start("alice", &mut gate).await.unwrap();

    let records = store.list_by_user("alice").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id, "alice");
    assert_eq!(handle.initial_capture().map(|p| p.id), Some(records[0].id));

    let snap = handle.snapshot();
    assert!(snap.is_active());
    assert_eq!(snap.capture_count(), 1);
    assert_eq!(snap.remaining_secs(), 600);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_n_cycles_give_n_plus_one_records() {
    let store = PunchInStore::in_memory().unwrap();
    let service = CaptureService::new(
        store.clone(),
        Arc::new(FixedLocation(here())),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::granted();
    let handle = service.start("alice", &mut gate).await.unwrap();

    tokio::time::sleep(Duration::from_millis(3 * CYCLE_MS + 500)).await;

    assert_eq!(store.list_by_user("alice").unwrap().len(), 4);
    let snap = handle.snapshot();
    assert_eq!(snap.completed_cycles(), 3);
    assert_eq!(snap.capture_count(), 4);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_warning_visible_in_snapshots() {
    let store = PunchInStore::in_memory().unwrap();
    let service = CaptureService::new(
        store.clone(),
        Arc::new(FixedLocation(here())),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::granted();
    let handle = service.start("alice", &mut gate).await.unwrap();

    tokio::time::sleep(Duration::from_millis(539_500)).await;
    assert!(!handle.snapshot().warning_shown());

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    let snap = handle.snapshot();
    assert!(snap.warning_shown());
    assert_eq!(snap.remaining_secs(), 60);

    tokio::time::sleep(Duration::from_millis(60_000)).await;
    let snap = handle.snapshot();
    assert!(!snap.warning_shown());
    assert_eq!(snap.remaining_secs(), 600);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_stop_resets_count_but_keeps_records() {
    let store = PunchInStore::in_memory().unwrap();
    let service = CaptureService::new(
        store.clone(),
        Arc::new(FixedLocation(here())),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::granted();
    let handle = service.start("alice", &mut gate).await.unwrap();

    tokio::time::sleep(Duration::from_millis(CYCLE_MS + 500)).await;

    let stopped = handle.stop().await.unwrap();
    assert!(!stopped.is_active());
    assert_eq!(stopped.capture_count(), 0);
    assert_eq!(store.list_by_user("alice").unwrap().len(), 2);

    // no more ticks after stop
    tokio::time::sleep(Duration::from_millis(2 * CYCLE_MS)).await;
    assert_eq!(store.list_by_user("alice").unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_permission_refused_requests_and_records_nothing() {
    let store = PunchInStore::in_memory().unwrap();
    let service = CaptureService::new(
        store.clone(),
        Arc::new(FixedLocation(here())),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::denied();

    let err = service.start("alice", &mut gate).await.err().expect("refused");
    assert!(matches!(err, AppError::PermissionDenied));
    assert_eq!(gate.requests, 1);
    assert!(store.list_by_user("alice").unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_fix_skips_one_capture() {
    let store = PunchInStore::in_memory().unwrap();
    let location = ScriptedLocation::new([Some(here()), None, Some(there())]);
    let service = CaptureService::new(
        store.clone(),
        Arc::new(location),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::granted();
    let handle = service.start("alice", &mut gate).await.unwrap();

    // first cycle: no fix
    tokio::time::sleep(Duration::from_millis(CYCLE_MS + 500)).await;
    assert_eq!(store.list_by_user("alice").unwrap().len(), 1);
    let snap = handle.snapshot();
    assert_eq!(snap.capture_count(), 1);
    assert_eq!(snap.completed_cycles(), 1);
    assert_eq!(snap.remaining_secs(), 600);

    // second cycle: fix again
    tokio::time::sleep(Duration::from_millis(CYCLE_MS)).await;
    let records = store.list_by_user("alice").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].coordinates(), there());
    assert_eq!(handle.snapshot().capture_count(), 2);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_no_fix_at_start_still_activates() {
    let store = PunchInStore::in_memory().unwrap();
    let service = CaptureService::new(
        store.clone(),
        Arc::new(ScriptedLocation::new([None])),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::granted();
    let handle = service.start("alice", &mut gate).await.unwrap();

    assert!(handle.initial_capture().is_none());
    assert!(handle.snapshot().is_active());
    assert_eq!(handle.snapshot().capture_count(), 0);
    assert!(store.list_by_user("alice").unwrap().is_empty());

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_countdown_keeps_running_during_slow_fix() {
    let store = PunchInStore::in_memory().unwrap();
    let service = CaptureService::new(
        store.clone(),
        Arc::new(SlowAfterFirst::new(Duration::from_secs(30))),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::granted();
    let handle = service.start("alice", &mut gate).await.unwrap();

    // the second fix is requested at 600 s and answers at 630 s
    tokio::time::sleep(Duration::from_millis(610_500)).await;
    let snap = handle.snapshot();
    assert_eq!(snap.remaining_secs(), 590);
    assert_eq!(snap.pending_captures(), 1);
    assert_eq!(snap.capture_count(), 1);
    assert_eq!(store.list_by_user("alice").unwrap().len(), 1);

    tokio::time::sleep(Duration::from_millis(30_000)).await;
    let snap = handle.snapshot();
    assert_eq!(snap.remaining_secs(), 560);
    assert_eq!(snap.pending_captures(), 0);
    assert_eq!(snap.capture_count(), 2);
    assert_eq!(store.list_by_user("alice").unwrap().len(), 2);

    // the next cycle is not pushed back by the slow fix
    tokio::time::sleep(Duration::from_millis(560_000)).await;
    let snap = handle.snapshot();
    assert_eq!(snap.completed_cycles(), 2);
    assert_eq!(snap.remaining_secs(), 600);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_warning_fires_while_fix_is_pending() {
    let store = PunchInStore::in_memory().unwrap();
    let service = CaptureService::new(
        store.clone(),
        Arc::new(SlowAfterFirst::new(Duration::from_secs(3_600))),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::granted();
    let handle = service.start("alice", &mut gate).await.unwrap();

    tokio::time::sleep(Duration::from_millis(CYCLE_MS + 540_500)).await;
    let snap = handle.snapshot();
    assert!(snap.warning_shown());
    assert_eq!(snap.remaining_secs(), 60);
    assert_eq!(snap.pending_captures(), 1);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_stop_abandons_in_flight_capture() {
    let store = PunchInStore::in_memory().unwrap();
    let service = CaptureService::new(
        store.clone(),
        Arc::new(SlowAfterFirst::new(Duration::from_secs(30))),
        CaptureTiming::default(),
    );
    let mut gate = StaticPermission::granted();
    let handle = service.start("alice", &mut gate).await.unwrap();

    tokio::time::sleep(Duration::from_millis(CYCLE_MS + 10_000)).await;
    assert_eq!(handle.snapshot().pending_captures(), 1);

    let before = tokio::time::Instant::now();
    let stopped = handle.stop().await.unwrap();
    assert_eq!(tokio::time::Instant::now(), before);
    assert!(!stopped.is_active());
    assert_eq!(stopped.pending_captures(), 0);

    // the abandoned fix would have answered by now
    tokio::time::sleep(Duration::from_millis(60_000)).await;
    assert_eq!(store.list_by_user("alice").unwrap().len(), 1);
}
