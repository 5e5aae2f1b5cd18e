//! AR experience dispatcher
//!
//! Single owner of every state machine. Session, gesture and UI signals enter
//! through [`ArExperience::handle_signal`] in arrival order; the clock is
//! advanced to each signal's timestamp before it is processed, so timers that
//! came due earlier fire first.

use std::sync::Arc;

use anchorview_types::ExperienceConfig;
use anchorview_types::formatting::format_rect;
use chrono::NaiveDateTime;

use crate::anchors::{AnchorTracker, CycleOutcome, Placement};
use crate::catalog::{CatalogError, OverlayCatalog};
use crate::events::{
    CycleDirection, RecoveryAction, SceneGraph, SessionControl, SessionSignal, StatusSink,
};
use crate::scene::{SceneQueue, SceneQueueError};
use crate::signal_processor::{RestartOutcome, SessionRecoveryController, TrackingQualityMonitor};
use crate::status::StatusBoard;
use crate::timing::secs_to_delta;

use super::ExperienceConfigExt;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Queue(#[from] SceneQueueError),
}

pub struct ArExperience {
    config: ExperienceConfig,
    anchors: AnchorTracker,
    tracking: TrackingQualityMonitor,
    recovery: SessionRecoveryController,
    status: StatusBoard,
    scene: SceneQueue,
}

impl ArExperience {
    /// Spawn the scene worker and load the overlay catalog on it.
    ///
    /// Fails when the overlay directory yields no usable image.
    pub async fn launch<G: SceneGraph>(
        config: ExperienceConfig,
        scene: G,
        status: Box<dyn StatusSink>,
        session: Box<dyn SessionControl>,
    ) -> Result<Self, LaunchError> {
        let queue = SceneQueue::spawn(scene)?;
        let directory = config.resolve_overlay_dir();
        tracing::info!(dir = %directory.display(), "Loading overlay catalog");

        let catalog = queue
            .load_catalog(directory, config.overlay_extension.clone())
            .await??;

        Ok(Self::new(config, Arc::new(catalog), queue, status, session))
    }

    pub fn new(
        config: ExperienceConfig,
        catalog: Arc<OverlayCatalog>,
        scene: SceneQueue,
        status: Box<dyn StatusSink>,
        session: Box<dyn SessionControl>,
    ) -> Self {
        let timing = config.timing;
        let recovery = SessionRecoveryController::new(
            session,
            config.detection(),
            secs_to_delta(timing.restart_cooldown_secs),
            secs_to_delta(timing.look_around_hint_secs),
        );

        Self {
            anchors: AnchorTracker::new(catalog),
            tracking: TrackingQualityMonitor::new(secs_to_delta(timing.escalation_delay_secs)),
            recovery,
            status: StatusBoard::new(status, secs_to_delta(timing.message_display_secs)),
            scene,
            config,
        }
    }

    // --- Lifecycle ---

    /// Run the session for the first time.
    pub fn start(&mut self, now: NaiveDateTime) {
        self.tick(now);
        self.recovery.start(now, &mut self.status);
    }

    pub fn suspend(&mut self) {
        self.recovery.suspend();
    }

    /// Fire every timer due at or before `now`.
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.recovery.tick(now);
        self.status.tick(now);
    }

    /// Earliest time at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        [self.status.next_deadline(), self.recovery.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    pub fn should_attempt_relocalization(&self) -> bool {
        self.recovery.should_attempt_relocalization()
    }

    /// Stop the scene worker once it has applied all queued geometry.
    pub fn shutdown(self) -> Result<(), SceneQueueError> {
        self.scene.shutdown()
    }

    // --- Signal dispatch ---

    pub fn handle_signals(&mut self, signals: &[SessionSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }

    /// Process one signal at its timestamp.
    ///
    /// A re-detected anchor refreshes its geometry without a second
    /// "Detected image" announcement.
    pub fn handle_signal(&mut self, signal: &SessionSignal) {
        let now = signal.timestamp();
        self.tick(now);

        match signal {
            SessionSignal::AnchorFound {
                anchor,
                node,
                name,
                physical_size,
                ..
            } => {
                let is_new = self.anchors.binding(*anchor).is_none();
                match self
                    .anchors
                    .on_anchor_found(*anchor, *node, name.clone(), *physical_size, now)
                {
                    Ok(placement) => self.apply(placement),
                    Err(e) => tracing::warn!(?anchor, error = %e, "No overlay geometry for anchor"),
                }

                // Only a new binding is announced. Announcing drops every
                // scheduled message, a pending tracking escalation included,
                // so limited tracking that was already counting down stays
                // silent until the next state change.
                if is_new {
                    self.status.cancel_all();
                    self.status.show(
                        format!("Detected image '{}'", name.as_deref().unwrap_or_default()),
                        None,
                        true,
                        now,
                    );
                }
            }

            SessionSignal::TrackingStateChanged { state, .. } => {
                self.tracking.handle_state_change(*state, now, &mut self.status);
            }

            SessionSignal::SessionInterrupted { .. } => {
                self.recovery.handle_interruption(now, &mut self.status);
            }

            SessionSignal::SessionInterruptionEnded { .. } => {
                self.recovery.handle_interruption_ended(now, &mut self.status);
            }

            SessionSignal::SessionFailed { failure, .. } => {
                self.recovery.handle_failure(failure, &mut self.status);
            }

            SessionSignal::Swipe {
                direction, target, ..
            } => match self.anchors.cycle(CycleDirection::from(*direction), *target) {
                Ok(CycleOutcome::Rebound(placement)) => self.apply(placement),
                Ok(CycleOutcome::CursorMoved { cursor }) => {
                    tracing::debug!(cursor, "Overlay cursor moved");
                }
                Err(e) => tracing::warn!(error = %e, "Swiped onto an unusable overlay"),
            },

            SessionSignal::RestartRequested { .. } => {
                self.restart(now);
            }

            SessionSignal::RecoveryChosen { action, .. } => match action {
                RecoveryAction::RestartSession => {
                    self.restart(now);
                }
            },
        }
    }

    /// Gated full session reset. Bindings are dropped along with the
    /// session's anchors.
    pub fn restart(&mut self, now: NaiveDateTime) -> RestartOutcome {
        let outcome = self.recovery.restart(now, &mut self.status);
        if outcome == RestartOutcome::Restarted {
            self.anchors.clear();
        }
        outcome
    }

    fn apply(&mut self, placement: Placement) {
        tracing::debug!(
            node = ?placement.node,
            overlay = placement.overlay.name(),
            dims = %format_rect(&placement.dims),
            "Applying overlay geometry"
        );
        if let Err(e) = self
            .scene
            .apply_geometry(placement.node, placement.dims, placement.overlay)
        {
            tracing::error!(error = %e, "Scene queue rejected geometry update");
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<OverlayCatalog> {
        self.anchors.catalog()
    }

    pub fn anchors(&self) -> &AnchorTracker {
        &self.anchors
    }

    pub fn tracking(&self) -> &TrackingQualityMonitor {
        &self.tracking
    }

    pub fn recovery(&self) -> &SessionRecoveryController {
        &self.recovery
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }
}
