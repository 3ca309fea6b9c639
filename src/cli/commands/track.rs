use crate::cli::AppContext;
use crate::cli::commands::{enter, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::capture::{CaptureSession, CaptureTiming};
use crate::core::location::{FileLocation, FixedLocation, LocationProvider};
use crate::core::navigation::Screen;
use crate::core::permission::{PermissionGate, StoredPermission};
use crate::core::tracker::CaptureService;
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::ui::messages::{header, info, punch, success, warning};
use crate::utils::time::{format_countdown, format_label};
use std::sync::Arc;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Track {
        lat,
        lon,
        location_file,
        cycles,
    } = cmd
    {
        let (session, mut nav) = enter(ctx, Screen::Capture)?;
        let timing = CaptureTiming::from_config(&ctx.cfg)?;

        // permission comes before anything else, including the location source
        let mut gate = StoredPermission::new(ctx.session.prefs().clone());
        if let Err(e) = CaptureService::check_permission(&mut gate) {
            if gate.is_granted()? {
                info("Permission granted: run `punchtracker track` again to start.");
            }
            return Err(e);
        }

        let location = resolve_location(*lat, *lon, location_file.as_deref(), &ctx.cfg)?;
        let service = CaptureService::new(open_store(ctx)?, location, timing);
        let handle = service.start(&session.user_id, &mut gate).await?;

        header("Tracking Active");
        info(format!(
            "Punching in every {} as '{}'. Press Ctrl+C to stop.",
            format_countdown(timing.interval_secs),
            session.user_id
        ));

        let mut last = handle.snapshot();
        if let Some(first) = handle.initial_capture() {
            punch(format!(
                "Punch-in #1 at {}: {}",
                format_label(first.timestamp),
                first.coordinates()
            ));
        }

        if *cycles != Some(0) {
            let mut state = handle.watch();
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            loop {
                tokio::select! {
                    _ = &mut ctrl_c => {
                        println!();
                        break;
                    }
                    changed = state.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let now = state.borrow_and_update().clone();
                        report(&last, &now);
                        last = now;

                        if cycles.is_some_and(|n| {
                            last.completed_cycles() >= n && last.pending_captures() == 0
                        }) {
                            break;
                        }
                    }
                }
            }
        }

        let recorded = last.capture_count();
        let stopped = handle.stop().await?;
        nav.back(stopped.is_active())?;

        success(format!("Tracking stopped. Punch-ins recorded: {}", recorded));
    }

    Ok(())
}

/// Print what changed between two snapshots.
fn report(before: &CaptureSession, now: &CaptureSession) {
    if now.warning_shown() && !before.warning_shown() {
        warning(format!(
            "Next punch-in in {}",
            describe_lead(now.timing().warning_at_secs)
        ));
    }

    if now.capture_count() > before.capture_count() {
        let at = now
            .last_location()
            .map(|c| c.to_string())
            .unwrap_or_default();
        punch(format!("Punch-in #{}: {}", now.capture_count(), at));
    }
}

fn describe_lead(secs: u32) -> String {
    match secs {
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{} seconds", s),
    }
}

fn resolve_location(
    lat: Option<f64>,
    lon: Option<f64>,
    file: Option<&str>,
    cfg: &Config,
) -> AppResult<Arc<dyn LocationProvider>> {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        return Ok(Arc::new(FixedLocation(Coordinates::new(lat, lon)?)));
    }

    match file.map(str::to_string).or_else(|| cfg.location_file.clone()) {
        Some(path) => Ok(Arc::new(FileLocation::new(path))),
        None => Err(AppError::Config(
            "no location source: pass --lat/--lon or --location-file, or set location_file".into(),
        )),
    }
}
