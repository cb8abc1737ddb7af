// src/models/disclosure.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisclosurePhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Animated modal state shared by the payment, withdrawal and feedback
/// sheets. Requests made mid-animation are ignored.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Disclosure {
    phase: DisclosurePhase,
    /// Animated value: 0.0 fully hidden, 1.0 fully shown.
    progress: f32,
}

impl Disclosure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DisclosurePhase {
        self.phase
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_visible(&self) -> bool {
        self.phase != DisclosurePhase::Closed
    }

    /// Returns false when the request was ignored.
    pub fn open(&mut self) -> bool {
        if self.phase != DisclosurePhase::Closed {
            return false;
        }
        self.phase = DisclosurePhase::Opening;
        true
    }

    pub fn close(&mut self) -> bool {
        if self.phase != DisclosurePhase::Open {
            return false;
        }
        self.phase = DisclosurePhase::Closing;
        true
    }

    /// Moves the animated value while a transition runs; clamped to 0..=1.
    pub fn animate_to(&mut self, progress: f32) {
        if matches!(self.phase, DisclosurePhase::Opening | DisclosurePhase::Closing) {
            self.progress = progress.clamp(0.0, 1.0);
        }
    }

    /// Animation completion callback. Returns the settled phase, if any.
    pub fn animation_finished(&mut self) -> Option<DisclosurePhase> {
        match self.phase {
            DisclosurePhase::Opening => {
                self.phase = DisclosurePhase::Open;
                self.progress = 1.0;
                Some(DisclosurePhase::Open)
            }
            DisclosurePhase::Closing => {
                self.phase = DisclosurePhase::Closed;
                self.progress = 0.0;
                Some(DisclosurePhase::Closed)
            }
            DisclosurePhase::Open | DisclosurePhase::Closed => None,
        }
    }
}
