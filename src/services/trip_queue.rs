// src/services/trip_queue.rs
use std::collections::VecDeque;

use crate::{
    errors::{WizaError, WizaResult},
    models::trip::{TripRequest, TripRequestStatus},
};

/// Pending ride requests offered to the driver, oldest first.
#[derive(Debug, Default)]
pub struct TripRequestQueue {
    pending: VecDeque<TripRequest>,
}

impl TripRequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: TripRequest) {
        self.pending.push_back(request);
    }

    pub fn pending(&self) -> Vec<TripRequest> {
        self.pending.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TripRequest> {
        self.pending.iter().find(|r| r.id == id)
    }

    /// Removes a pending request and marks it with its resolution.
    pub fn resolve(&mut self, id: &str, resolution: TripRequestStatus) -> WizaResult<TripRequest> {
        let index = self
            .pending
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| WizaError::TripRequestNotFound(id.to_string()))?;
        let mut request = self
            .pending
            .remove(index)
            .ok_or_else(|| WizaError::TripRequestNotFound(id.to_string()))?;
        request.status = resolution;
        Ok(request)
    }
}
