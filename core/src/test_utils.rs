//! Shared fixtures for unit tests: recording collaborators and a fixed clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use anchorview_types::RectDimensions;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use image::RgbaImage;

use crate::catalog::{OverlayCatalog, OverlayImage};
use crate::events::{DetectionConfig, NodeId, RunOptions, SceneGraph, SessionControl, StatusSink};
use crate::status::{ErrorDialog, StatusMessage};

/// Fixed session start time.
pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// `t0` plus `secs` seconds (millisecond precision).
pub fn at(secs: f64) -> NaiveDateTime {
    t0() + TimeDelta::milliseconds((secs * 1000.0).round() as i64)
}

/// Catalog of blank images named `overlay_<i>` with the given pixel sizes.
pub fn catalog(sizes: &[(u32, u32)]) -> Arc<OverlayCatalog> {
    let images = sizes
        .iter()
        .enumerate()
        .map(|(i, (w, h))| OverlayImage::new(format!("overlay_{i}"), RgbaImage::new(*w, *h)))
        .collect();
    Arc::new(OverlayCatalog::from_images(images).unwrap())
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Shown(StatusMessage),
    Hidden,
    Error(ErrorDialog),
}

/// Status sink that records every call; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<UiEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }

    pub fn shown_texts(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Shown(msg) => Some(msg.text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count_shown(&self, text: &str) -> usize {
        self.shown_texts().iter().filter(|t| t.as_str() == text).count()
    }

    pub fn errors(&self) -> Vec<ErrorDialog> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Error(dialog) => Some(dialog.clone()),
                _ => None,
            })
            .collect()
    }
}

impl StatusSink for RecordingSink {
    fn show_message(&mut self, message: &StatusMessage) {
        self.events.borrow_mut().push(UiEvent::Shown(message.clone()));
    }

    fn hide_message(&mut self) {
        self.events.borrow_mut().push(UiEvent::Hidden);
    }

    fn show_error(&mut self, dialog: &ErrorDialog) {
        self.events.borrow_mut().push(UiEvent::Error(dialog.clone()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    Run(DetectionConfig, RunOptions),
    Pause,
}

/// Session control that records every call; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSession {
    calls: Rc<RefCell<Vec<SessionCall>>>,
}

impl RecordingSession {
    pub fn calls(&self) -> Vec<SessionCall> {
        self.calls.borrow().clone()
    }

    pub fn run_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, SessionCall::Run(..)))
            .count()
    }
}

impl SessionControl for RecordingSession {
    fn run(&mut self, detection: &DetectionConfig, options: RunOptions) {
        self.calls
            .borrow_mut()
            .push(SessionCall::Run(detection.clone(), options));
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(SessionCall::Pause);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedGeometry {
    pub node: NodeId,
    pub dims: RectDimensions,
    pub overlay: String,
}

/// Scene graph that records applied geometry; safe to move to the worker thread.
#[derive(Clone, Default)]
pub struct RecordingScene {
    applied: Arc<Mutex<Vec<AppliedGeometry>>>,
}

impl RecordingScene {
    pub fn applied(&self) -> Vec<AppliedGeometry> {
        self.applied.lock().unwrap().clone()
    }
}

impl SceneGraph for RecordingScene {
    fn apply_geometry(&mut self, node: NodeId, dims: RectDimensions, overlay: &OverlayImage) {
        self.applied.lock().unwrap().push(AppliedGeometry {
            node,
            dims,
            overlay: overlay.name().to_string(),
        });
    }
}
