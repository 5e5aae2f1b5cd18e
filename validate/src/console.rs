//! Console collaborators
//!
//! Print every UI, session and scene call so a replay can be read top to
//! bottom. Counters are shared with the caller for the final summary.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anchorview_core::OverlayImage;
use anchorview_core::events::{
    DetectionConfig, NodeId, RunOptions, SceneGraph, SessionControl, StatusSink,
};
use anchorview_core::status::{ErrorDialog, StatusMessage};
use anchorview_types::RectDimensions;
use anchorview_types::formatting::{format_pixels, format_rect};
use chrono::NaiveDateTime;

/// Replay clock shared by the printing collaborators.
#[derive(Clone)]
pub struct ReplayClock {
    start: NaiveDateTime,
    now: Rc<Cell<NaiveDateTime>>,
}

impl ReplayClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    /// `[  12.500s]` offset of the current replay time.
    pub fn stamp(&self) -> String {
        let offset = self.now.get() - self.start;
        format!("[{:>9.3}s]", offset.num_milliseconds() as f64 / 1000.0)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UiCounts {
    pub shown: usize,
    pub hidden: usize,
    pub errors: usize,
}

pub struct ConsoleStatus {
    clock: ReplayClock,
    counts: Rc<Cell<UiCounts>>,
}

impl ConsoleStatus {
    pub fn new(clock: ReplayClock) -> (Self, Rc<Cell<UiCounts>>) {
        let counts = Rc::new(Cell::new(UiCounts::default()));
        (
            Self {
                clock,
                counts: Rc::clone(&counts),
            },
            counts,
        )
    }

    fn bump(&self, f: impl FnOnce(&mut UiCounts)) {
        let mut counts = self.counts.get();
        f(&mut counts);
        self.counts.set(counts);
    }
}

impl StatusSink for ConsoleStatus {
    fn show_message(&mut self, message: &StatusMessage) {
        self.bump(|c| c.shown += 1);
        let kind = message
            .kind
            .map(|k| format!(" ({k:?})"))
            .unwrap_or_default();
        let persistence = if message.auto_hide { "" } else { " [persistent]" };
        println!(
            "{} MESSAGE{}{}: {}",
            self.clock.stamp(),
            kind,
            persistence,
            message.text.replace('\n', " / ")
        );
    }

    fn hide_message(&mut self) {
        self.bump(|c| c.hidden += 1);
        println!("{} MESSAGE hidden", self.clock.stamp());
    }

    fn show_error(&mut self, dialog: &ErrorDialog) {
        self.bump(|c| c.errors += 1);
        println!(
            "{} ERROR DIALOG: {} | {} [{}]",
            self.clock.stamp(),
            dialog.title,
            dialog.message.replace('\n', " / "),
            dialog.action.label()
        );
    }
}

pub struct ConsoleSession {
    clock: ReplayClock,
    runs: Rc<Cell<usize>>,
}

impl ConsoleSession {
    pub fn new(clock: ReplayClock) -> (Self, Rc<Cell<usize>>) {
        let runs = Rc::new(Cell::new(0));
        (
            Self {
                clock,
                runs: Rc::clone(&runs),
            },
            runs,
        )
    }
}

impl SessionControl for ConsoleSession {
    fn run(&mut self, detection: &DetectionConfig, options: RunOptions) {
        self.runs.set(self.runs.get() + 1);
        println!(
            "{} SESSION run #{} (group '{}', reset_tracking={}, remove_anchors={})",
            self.clock.stamp(),
            self.runs.get(),
            detection.reference_group,
            options.reset_tracking,
            options.remove_existing_anchors
        );
    }

    fn pause(&mut self) {
        println!("{} SESSION paused", self.clock.stamp());
    }
}

/// Runs on the scene worker thread, so it only counts and prints.
pub struct ConsoleScene {
    applied: Arc<AtomicUsize>,
}

impl ConsoleScene {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let applied = Arc::new(AtomicUsize::new(0));
        (
            Self {
                applied: Arc::clone(&applied),
            },
            applied,
        )
    }
}

impl SceneGraph for ConsoleScene {
    fn apply_geometry(&mut self, node: NodeId, dims: RectDimensions, overlay: &OverlayImage) {
        self.applied.fetch_add(1, Ordering::Relaxed);
        println!(
            "              SCENE node {} <- {} ({}) at {}",
            node.0,
            overlay.name(),
            format_pixels(&overlay.size()),
            format_rect(&dims)
        );
    }
}
