// src/services/checkin_service.rs
use rand::Rng;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing;

use crate::{
    errors::{WizaError, WizaResult},
    models::{
        checkin::{CheckInCode, CheckInOutcome, CheckInPhase, CheckInStatus, PassengerHistoryEntry, ScanResult},
        disclosure::{Disclosure, DisclosurePhase},
    },
    utils::{
        clock::Clock,
        id_generator::{IdGenerator, IdType},
    },
};

pub const HISTORY_LIMIT: usize = 3;
pub const DEFAULT_SCAN_SUCCESS_RATE: f64 = 0.7;

// Stand-ins until codes are resolved against real bookings.
const MANUAL_PASSENGER: &str = "João Silva";
const SCANNED_PASSENGER: &str = "Maria Santos";

/// Decides whether a boarding code or scan admits a passenger and keeps the
/// short list of recent check-ins shown under the scanner.
pub struct CheckInValidator {
    accepted: HashSet<String>,
    history: VecDeque<PassengerHistoryEntry>,
    clock: Arc<dyn Clock>,
}

impl CheckInValidator {
    pub fn new<I, S>(accepted_codes: I, clock: Arc<dyn Clock>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted: accepted_codes.into_iter().map(Into::into).collect(),
            history: VecDeque::with_capacity(HISTORY_LIMIT + 1),
            clock,
        }
    }

    /// Recent check-ins the screen opens with, one of them failed.
    pub fn with_demo_history(mut self) -> Self {
        let now = self.clock.now();
        let seed = [
            ("Maria Silva", 2, CheckInStatus::Confirmed),
            ("João Santos", 19, CheckInStatus::Confirmed),
            ("Ana Costa", 36, CheckInStatus::Error),
        ];
        self.history = seed
            .into_iter()
            .map(|(name, minutes_ago, status)| {
                let checked_in_at = now - chrono::Duration::minutes(minutes_ago);
                PassengerHistoryEntry {
                    id: IdGenerator::generate_with_timestamp(IdType::CheckIn, checked_in_at),
                    name: name.to_string(),
                    checked_in_at,
                    status,
                }
            })
            .collect();
        self
    }

    /// Malformed input is a validation error; a well-formed but unknown code
    /// is a rejected outcome.
    pub fn validate_manual(&mut self, raw: &str) -> WizaResult<CheckInOutcome> {
        let code = CheckInCode::parse(raw)?;

        if self.accepted.contains(code.as_str()) {
            tracing::info!("Check-in code {} accepted", code);
            self.record(MANUAL_PASSENGER);
            Ok(CheckInOutcome::Confirmed {
                title: "Código Validado!".to_string(),
                passenger_name: MANUAL_PASSENGER.to_string(),
            })
        } else {
            tracing::warn!("Check-in code {} not recognised", code);
            Ok(CheckInOutcome::Rejected {
                title: "Código Inválido".to_string(),
                reason: "Verifique o código e tente novamente".to_string(),
            })
        }
    }

    pub fn validate_scan(&mut self, scan: ScanResult) -> CheckInOutcome {
        match scan {
            ScanResult::Passenger { name } => {
                tracing::info!("QR check-in confirmed for {}", name);
                self.record(&name);
                CheckInOutcome::Confirmed {
                    title: "Passageiro Confirmado!".to_string(),
                    passenger_name: name,
                }
            }
            ScanResult::Unreadable => {
                tracing::warn!("QR check-in failed: unreadable code");
                CheckInOutcome::Rejected {
                    title: "QR Code Inválido".to_string(),
                    reason: "Código não encontrado ou expirado".to_string(),
                }
            }
        }
    }

    /// Newest first, at most three entries.
    pub fn history(&self) -> Vec<PassengerHistoryEntry> {
        self.history.iter().cloned().collect()
    }

    fn record(&mut self, name: &str) {
        let now = self.clock.now();
        self.history.push_front(PassengerHistoryEntry {
            id: IdGenerator::generate_with_timestamp(IdType::CheckIn, now),
            name: name.to_string(),
            checked_in_at: now,
            status: CheckInStatus::Confirmed,
        });
        self.history.truncate(HISTORY_LIMIT);
    }
}

/// Reads one frame from the camera.
pub trait ScanDecoder: Send {
    fn decode(&mut self) -> ScanResult;
}

/// Camera stand-in: succeeds with a fixed probability.
pub struct SimulatedScanDecoder<R> {
    rng: R,
    success_rate: f64,
}

impl<R: Rng + Send> SimulatedScanDecoder<R> {
    /// Rates outside 0..=1 are clamped; NaN falls back to the default rate.
    pub fn new(rng: R, success_rate: f64) -> Self {
        let success_rate = if success_rate.is_nan() {
            DEFAULT_SCAN_SUCCESS_RATE
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        Self { rng, success_rate }
    }
}

impl<R: Rng + Send> ScanDecoder for SimulatedScanDecoder<R> {
    fn decode(&mut self) -> ScanResult {
        if self.rng.random_bool(self.success_rate) {
            ScanResult::Passenger {
                name: SCANNED_PASSENGER.to_string(),
            }
        } else {
            ScanResult::Unreadable
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckInSnapshot {
    #[serde(flatten)]
    pub phase: CheckInPhase,
    pub feedback_modal: DisclosurePhase,
    pub history: Vec<PassengerHistoryEntry>,
}

struct CheckInSession {
    validator: CheckInValidator,
    decoder: Box<dyn ScanDecoder>,
    phase: CheckInPhase,
    feedback: Disclosure,
}

impl CheckInSession {
    fn show_feedback(&mut self, outcome: CheckInOutcome) {
        self.phase = CheckInPhase::Feedback { outcome };
        self.feedback.open();
    }

    fn snapshot(&self) -> CheckInSnapshot {
        CheckInSnapshot {
            phase: self.phase.clone(),
            feedback_modal: self.feedback.phase(),
            history: self.validator.history(),
        }
    }
}

/// The driver's check-in screen: scanner, manual entry and the feedback
/// modal that pauses scanning until it is dismissed.
pub struct CheckInService {
    session: Mutex<CheckInSession>,
    scan_delay: Duration,
}

impl CheckInService {
    pub fn new(validator: CheckInValidator, decoder: Box<dyn ScanDecoder>, scan_delay: Duration) -> Self {
        Self {
            session: Mutex::new(CheckInSession {
                validator,
                decoder,
                phase: CheckInPhase::Scanning,
                feedback: Disclosure::new(),
            }),
            scan_delay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CheckInSession> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> CheckInSnapshot {
        self.lock().snapshot()
    }

    pub fn history(&self) -> Vec<PassengerHistoryEntry> {
        self.lock().validator.history()
    }

    /// Runs one simulated scan. Dropping the future before it resolves puts
    /// the scanner back to `scanning` and records nothing.
    pub async fn scan(&self) -> WizaResult<CheckInOutcome> {
        {
            let mut session = self.lock();
            if session.phase != CheckInPhase::Scanning {
                return Err(WizaError::ScannerNotActive);
            }
            session.phase = CheckInPhase::Validating;
        }

        let mut pending = PendingScan {
            session: &self.session,
            finished: false,
        };

        tokio::time::sleep(self.scan_delay).await;

        let mut session = self.lock();
        let result = session.decoder.decode();
        let outcome = session.validator.validate_scan(result);
        session.show_feedback(outcome.clone());
        pending.finished = true;
        Ok(outcome)
    }

    pub fn submit_code(&self, raw: &str) -> WizaResult<CheckInOutcome> {
        let mut session = self.lock();
        if session.phase != CheckInPhase::Scanning {
            return Err(WizaError::ScannerNotActive);
        }
        let outcome = session.validator.validate_manual(raw)?;
        session.show_feedback(outcome.clone());
        Ok(outcome)
    }

    /// Closes the feedback modal in one go, playing out any running animation.
    pub fn dismiss_feedback(&self) -> CheckInSnapshot {
        let mut session = self.lock();
        if session.feedback.phase() == DisclosurePhase::Opening {
            session.feedback.animation_finished();
        }
        if session.feedback.close() {
            Self::settle(&mut session);
        }
        session.snapshot()
    }

    /// Animation callback for clients that drive the modal themselves.
    pub fn feedback_animation_finished(&self) -> CheckInSnapshot {
        let mut session = self.lock();
        Self::settle(&mut session);
        session.snapshot()
    }

    fn settle(session: &mut CheckInSession) {
        if session.feedback.animation_finished() == Some(DisclosurePhase::Closed) {
            session.phase = CheckInPhase::Scanning;
            tracing::debug!("Feedback closed, scanner active");
        }
    }
}

/// Restores the scanner if a scan is abandoned mid-delay.
struct PendingScan<'a> {
    session: &'a Mutex<CheckInSession>,
    finished: bool,
}

impl Drop for PendingScan<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut session = self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if session.phase == CheckInPhase::Validating {
            session.phase = CheckInPhase::Scanning;
            tracing::debug!("Scan cancelled, scanner restored");
        }
    }
}
