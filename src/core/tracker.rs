//! Runs a [`CaptureSession`] against the wall clock.
//!
//! [`CaptureService::start`] performs the initial capture and spawns a tokio
//! task that ticks the session once per second. Later captures run as their
//! own tasks, so a slow location fix never holds the countdown. The returned
//! [`CaptureHandle`] is the only way to stop it; dropping the handle stops
//! the task as well.

use crate::core::capture::{CaptureSession, CaptureTiming, Tick};
use crate::core::location::LocationProvider;
use crate::core::permission::PermissionGate;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::punch_in::{NewPunchIn, PunchIn};
use crate::store::PunchInStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info};

const TICK: Duration = Duration::from_secs(1);

pub struct CaptureService {
    store: PunchInStore,
    location: Arc<dyn LocationProvider>,
    timing: CaptureTiming,
}

impl CaptureService {
    /// First step of every start: without permission a request is issued
    /// and [`AppError::PermissionDenied`] returned.
    pub fn check_permission(gate: &mut dyn PermissionGate) -> AppResult<()> {
        if gate.is_granted()? {
            return Ok(());
        }
        let granted = gate.request()?;
        info!(granted, "location permission requested");
        Err(AppError::PermissionDenied)
    }

    pub fn new(
        store: PunchInStore,
        location: Arc<dyn LocationProvider>,
        timing: CaptureTiming,
    ) -> Self {
        Self {
            store,
            location,
            timing,
        }
    }

    /// Idle → Active for `user_id`.
    ///
    /// Without location permission a request is issued through `gate` and
    /// the start is refused with [`AppError::PermissionDenied`]; the caller
    /// may try again once the permission is granted.
    pub async fn start(
        &self,
        user_id: &str,
        gate: &mut dyn PermissionGate,
    ) -> AppResult<CaptureHandle> {
        Self::check_permission(gate)?;

        let mut session = CaptureSession::new(self.timing);
        session.activate();

        self.store.with_conn(|conn| {
            audit(conn, "track_start", user_id, "Tracking started");
            Ok(())
        })?;

        let first = capture_once(&self.store, self.location.as_ref(), user_id).await?;
        if let Some(record) = &first {
            session.record_capture(record.coordinates());
        }

        let (state_tx, state_rx) = watch::channel(session.clone());
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_loop(
            self.store.clone(),
            Arc::clone(&self.location),
            user_id.to_string(),
            session,
            state_tx,
            cancel.clone(),
        ));

        Ok(CaptureHandle {
            guard: cancel.drop_guard(),
            task,
            state: state_rx,
            first,
            user_id: user_id.to_string(),
            store: self.store.clone(),
        })
    }
}

pub struct CaptureHandle {
    guard: DropGuard,
    task: JoinHandle<AppResult<CaptureSession>>,
    state: watch::Receiver<CaptureSession>,
    first: Option<PunchIn>,
    user_id: String,
    store: PunchInStore,
}

impl CaptureHandle {
    /// Record written on activation, if a fix was available.
    pub fn initial_capture(&self) -> Option<&PunchIn> {
        self.first.as_ref()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn snapshot(&self) -> CaptureSession {
        self.state.borrow().clone()
    }

    /// Receiver updated after every tick.
    pub fn watch(&self) -> watch::Receiver<CaptureSession> {
        self.state.clone()
    }

    /// True once the loop ended on its own (storage failure).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Active → Idle. Returns the final session, or the storage error that
    /// ended the loop early.
    pub async fn stop(self) -> AppResult<CaptureSession> {
        let CaptureHandle {
            guard,
            task,
            user_id,
            store,
            ..
        } = self;

        drop(guard);

        let session = task
            .await
            .map_err(|e| AppError::Other(format!("capture task failed: {e}")))??;

        store.with_conn(|conn| {
            audit(
                conn,
                "track_stop",
                &user_id,
                &format!("Tracking stopped after {} cycle(s)", session.completed_cycles()),
            );
            Ok(())
        })?;

        Ok(session)
    }
}

/// Acquire one fix and persist it. No fix means no record.
async fn capture_once(
    store: &PunchInStore,
    location: &dyn LocationProvider,
    user_id: &str,
) -> AppResult<Option<PunchIn>> {
    let Some(coords) = location.last_known_location().await else {
        info!(user_id, "location unavailable, capture skipped");
        return Ok(None);
    };

    let record = store.insert(&NewPunchIn::now(coords, user_id))?;
    debug!(user_id, id = record.id, "punch-in recorded");
    Ok(Some(record))
}

async fn run_loop(
    store: PunchInStore,
    location: Arc<dyn LocationProvider>,
    user_id: String,
    mut session: CaptureSession,
    state_tx: watch::Sender<CaptureSession>,
    cancel: CancellationToken,
) -> AppResult<CaptureSession> {
    let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut captures: JoinSet<AppResult<Option<PunchIn>>> = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            Some(joined) = captures.join_next(), if !captures.is_empty() => {
                let outcome = joined
                    .map_err(|e| AppError::Other(format!("capture task failed: {e}")))
                    .and_then(|r| r);
                match outcome {
                    Ok(record) => session.capture_finished(record.map(|r| r.coordinates())),
                    Err(e) => {
                        error!(user_id = %user_id, error = %e, "punch-in could not be stored");
                        captures.shutdown().await;
                        state_tx.send_replace(session.clone());
                        return Err(e);
                    }
                }
            }
            _ = ticker.tick() => match session.tick() {
                Tick::Warning => {
                    info!(user_id = %user_id, remaining = session.remaining_secs(), "next punch-in soon");
                }
                Tick::CaptureDue => {
                    let store = store.clone();
                    let location = Arc::clone(&location);
                    let user_id = user_id.clone();
                    captures.spawn(async move {
                        capture_once(&store, location.as_ref(), &user_id).await
                    });
                    session.capture_started();
                }
                Tick::Counting | Tick::Idle => {}
            },
        }

        state_tx.send_replace(session.clone());
    }

    // in-flight captures are abandoned
    captures.shutdown().await;
    session.deactivate();
    state_tx.send_replace(session.clone());
    Ok(session)
}
