//! The fetch-or-generate policy.
//!
//! One interpretation exists per report. The flow checks the store first;
//! a missing row is the normal "generate new" branch, and generation
//! persists exactly once before returning. `Done` and `Failed` are
//! terminal; only an explicit `retry` leaves `Failed`.

use tracing::{info, warn};
use uuid::Uuid;

use labwise_core::models::interpretation::LabInterpretation;
use labwise_core::models::report::LabReport;
use labwise_core::store::{InterpretationStore, StoreError};

use crate::client::InterpretationGenerator;
use crate::error::InterpretError;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Uninitiated,
    CheckingExisting,
    Generating,
    Done(LabInterpretation),
    Failed(String),
}

/// Per-report interpretation flow.
///
/// Drives `Uninitiated → CheckingExisting → Done` when a row exists, or
/// `→ Generating → Done | Failed` when one has to be produced. Running a
/// `Done` flow again returns the held value without touching the store or
/// the generator.
pub struct InterpretationFlow {
    report_id: Uuid,
    state: FlowState,
}

impl InterpretationFlow {
    pub fn new(report_id: Uuid) -> Self {
        Self {
            report_id,
            state: FlowState::Uninitiated,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn interpretation(&self) -> Option<&LabInterpretation> {
        match &self.state {
            FlowState::Done(interp) => Some(interp),
            _ => None,
        }
    }

    /// Manual retry: the only exit from `Failed`. Returns false (and does
    /// nothing) from any other state.
    pub fn retry(&mut self) -> bool {
        if matches!(self.state, FlowState::Failed(_)) {
            self.state = FlowState::Uninitiated;
            true
        } else {
            false
        }
    }

    /// Run the flow to a terminal state.
    pub async fn run<S, G>(
        &mut self,
        store: &S,
        generator: &G,
        report: &LabReport,
        created_by: &str,
    ) -> Result<&LabInterpretation, InterpretError>
    where
        S: InterpretationStore + ?Sized,
        G: InterpretationGenerator + ?Sized,
    {
        match &self.state {
            FlowState::Done(_) => {
                // Idempotent: nothing to do, no traffic.
                return Ok(self.held());
            }
            FlowState::Failed(message) => {
                return Err(InterpretError::Service(message.clone()));
            }
            _ => {}
        }

        self.state = FlowState::CheckingExisting;
        match store.find_interpretation(self.report_id).await {
            Ok(Some(existing)) => {
                info!(report_id = %self.report_id, "interpretation found in store");
                self.state = FlowState::Done(existing);
                return Ok(self.held());
            }
            Ok(None) => {
                // Normal branch: nothing stored yet, generate one.
            }
            Err(e) => {
                let message = e.to_string();
                self.state = FlowState::Failed(message);
                return Err(InterpretError::Store(e));
            }
        }

        self.state = FlowState::Generating;
        let interpretation = match generator.generate(report, created_by).await {
            Ok(interp) => interp,
            Err(e) => {
                self.state = FlowState::Failed(e.to_string());
                return Err(e);
            }
        };

        match store
            .insert_interpretation(self.report_id, &interpretation, created_by)
            .await
        {
            Ok(()) => {
                info!(report_id = %self.report_id, "interpretation generated and stored");
                self.state = FlowState::Done(interpretation);
                Ok(self.held())
            }
            Err(StoreError::Conflict(_)) => {
                // Lost a concurrent race; the winning row is authoritative.
                warn!(report_id = %self.report_id, "concurrent interpretation insert, re-reading");
                match store.find_interpretation(self.report_id).await {
                    Ok(Some(winner)) => {
                        self.state = FlowState::Done(winner);
                        Ok(self.held())
                    }
                    Ok(None) => {
                        let message = "interpretation vanished after insert conflict".to_string();
                        self.state = FlowState::Failed(message.clone());
                        Err(InterpretError::Service(message))
                    }
                    Err(e) => {
                        self.state = FlowState::Failed(e.to_string());
                        Err(InterpretError::Store(e))
                    }
                }
            }
            Err(e) => {
                self.state = FlowState::Failed(e.to_string());
                Err(InterpretError::Store(e))
            }
        }
    }

    fn held(&self) -> &LabInterpretation {
        match &self.state {
            FlowState::Done(interp) => interp,
            _ => unreachable!("held() is only called from the Done state"),
        }
    }
}
