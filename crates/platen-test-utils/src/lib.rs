//! Testing utilities for the Platen workspace
//!
//! Shared test doubles and fixtures: a recording messenger, canned
//! mass estimators, and STL byte builders.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use platen_engine::{
    EngineConfig, Messenger, MessengerError, PlainTextRenderer, PromptHandle, SessionEngine,
};
use platen_order::SessionId;
use platen_pricing::{EstimationError, MassEstimator, RateTable};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// One observed messenger call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessengerEvent {
    Prompt {
        session: SessionId,
        handle: PromptHandle,
        text: String,
        actionable: bool,
    },
    Retraction {
        session: SessionId,
        handle: PromptHandle,
        found: bool,
    },
    Document {
        session: SessionId,
        filename: String,
        bytes: Vec<u8>,
    },
}

/// Messenger double that records every call
///
/// Tracks live prompt handles so retraction of an unknown handle
/// reports `PromptNotFound` like a real transport. With
/// `fail_retractions` set, every retraction reports `PromptNotFound`
/// regardless (for exercising best-effort cleanup paths).
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    next_handle: AtomicU64,
    live: Mutex<HashSet<PromptHandle>>,
    events: Mutex<Vec<MessengerEvent>>,
    fail_retractions: AtomicBool,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything observed so far, in call order
    pub fn events(&self) -> Vec<MessengerEvent> {
        self.events.lock().clone()
    }

    /// Texts of issued prompts, in call order
    pub fn prompt_texts(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                MessengerEvent::Prompt { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Texts of actionable prompts only
    pub fn actionable_prompt_texts(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                MessengerEvent::Prompt {
                    text,
                    actionable: true,
                    ..
                } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Delivered documents as (filename, bytes)
    pub fn documents(&self) -> Vec<(String, Vec<u8>)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                MessengerEvent::Document {
                    filename, bytes, ..
                } => Some((filename.clone(), bytes.clone())),
                _ => None,
            })
            .collect()
    }

    /// Prompts issued and not yet retracted
    pub fn live_prompt_count(&self) -> usize {
        self.live.lock().len()
    }

    /// Make every subsequent retraction report `PromptNotFound`
    pub fn set_fail_retractions(&self, fail: bool) {
        self.fail_retractions.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn issue_prompt(
        &self,
        session: SessionId,
        text: &str,
        actionable: bool,
    ) -> Result<PromptHandle, MessengerError> {
        let handle = PromptHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.live.lock().insert(handle);
        self.events.lock().push(MessengerEvent::Prompt {
            session,
            handle,
            text: text.to_string(),
            actionable,
        });
        Ok(handle)
    }

    async fn retract_prompt(
        &self,
        session: SessionId,
        handle: PromptHandle,
    ) -> Result<(), MessengerError> {
        let found = !self.fail_retractions.load(Ordering::SeqCst)
            && self.live.lock().remove(&handle);
        self.events.lock().push(MessengerEvent::Retraction {
            session,
            handle,
            found,
        });
        if found {
            Ok(())
        } else {
            Err(MessengerError::PromptNotFound(handle))
        }
    }

    async fn deliver_document(
        &self,
        session: SessionId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), MessengerError> {
        self.events.lock().push(MessengerEvent::Document {
            session,
            filename: filename.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}

/// Estimator returning the same mass for every item
#[derive(Debug, Clone, Copy)]
pub struct FixedMassEstimator {
    pub grams: f64,
}

impl FixedMassEstimator {
    pub fn new(grams: f64) -> Self {
        Self { grams }
    }
}

impl MassEstimator for FixedMassEstimator {
    fn unit_mass_grams(&self, _item: &str, _density: f64) -> Result<f64, EstimationError> {
        Ok(self.grams)
    }
}

/// Estimator that always fails with `ModelNotFound`
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingMassEstimator;

impl MassEstimator for FailingMassEstimator {
    fn unit_mass_grams(&self, item: &str, _density: f64) -> Result<f64, EstimationError> {
        Err(EstimationError::ModelNotFound {
            item: item.to_string(),
        })
    }
}

/// Engine wired to a recording messenger and a fixed-mass estimator
pub fn engine_with_recorder(
    config: EngineConfig,
    grams: f64,
) -> (Arc<SessionEngine>, Arc<RecordingMessenger>) {
    let messenger = Arc::new(RecordingMessenger::new());
    let engine = Arc::new(SessionEngine::new(
        config,
        Arc::clone(&messenger) as Arc<dyn Messenger>,
        Arc::new(FixedMassEstimator::new(grams)),
        Arc::new(PlainTextRenderer),
        RateTable::default(),
    ));
    (engine, messenger)
}

/// Engine whose every pricing attempt fails at estimation
pub fn engine_with_failing_estimator(
    config: EngineConfig,
) -> (Arc<SessionEngine>, Arc<RecordingMessenger>) {
    let messenger = Arc::new(RecordingMessenger::new());
    let engine = Arc::new(SessionEngine::new(
        config,
        Arc::clone(&messenger) as Arc<dyn Messenger>,
        Arc::new(FailingMassEstimator),
        Arc::new(PlainTextRenderer),
        RateTable::default(),
    ));
    (engine, messenger)
}

/// Binary STL bytes for an axis-aligned cube of `side` mm
pub fn binary_cube_stl(side: f32) -> Vec<u8> {
    let mut out = vec![0u8; 80];
    let triangles = cube_triangles(side);
    out.extend_from_slice(&u32::try_from(triangles.len()).unwrap().to_le_bytes());
    for t in &triangles {
        out.extend_from_slice(&[0u8; 12]);
        for v in t {
            for c in v {
                out.extend_from_slice(&c.to_le_bytes());
            }
        }
        out.extend_from_slice(&[0u8; 2]);
    }
    out
}

/// ASCII STL text for an axis-aligned cube of `side` mm
pub fn ascii_cube_stl(side: f32) -> String {
    let mut out = String::from("solid cube\n");
    for t in cube_triangles(side) {
        out.push_str("  facet normal 0 0 0\n    outer loop\n");
        for v in t {
            out.push_str(&format!("      vertex {} {} {}\n", v[0], v[1], v[2]));
        }
        out.push_str("    endloop\n  endfacet\n");
    }
    out.push_str("endsolid cube\n");
    out
}

fn cube_triangles(side: f32) -> Vec<[[f32; 3]; 3]> {
    let s = side;
    let quads: [[[f32; 3]; 4]; 6] = [
        [[0.0, 0.0, 0.0], [0.0, s, 0.0], [s, s, 0.0], [s, 0.0, 0.0]],
        [[0.0, 0.0, s], [s, 0.0, s], [s, s, s], [0.0, s, s]],
        [[0.0, 0.0, 0.0], [s, 0.0, 0.0], [s, 0.0, s], [0.0, 0.0, s]],
        [[0.0, s, 0.0], [0.0, s, s], [s, s, s], [s, s, 0.0]],
        [[0.0, 0.0, 0.0], [0.0, 0.0, s], [0.0, s, s], [0.0, s, 0.0]],
        [[s, 0.0, 0.0], [s, s, 0.0], [s, s, s], [s, 0.0, s]],
    ];
    let mut triangles = Vec::with_capacity(12);
    for q in quads {
        triangles.push([q[0], q[1], q[2]]);
        triangles.push([q[0], q[2], q[3]]);
    }
    triangles
}
