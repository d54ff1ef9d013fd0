// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::WorkflowError;
use crate::gateway::{ServiceError, SubmissionOutcome};
use crate::in_flight::InFlightFlag;
use crate::verification::VerificationController;
use std::future::Future;
use tracing::{info, warn};

/// Sends one bulk action at a time.
///
/// At most one submission is outstanding per submitter. A second call made
/// while the first is awaiting the backend fails immediately and performs no
/// request.
#[derive(Debug, Default)]
pub struct BulkSubmitter {
    in_flight: InFlightFlag,
}

impl BulkSubmitter {
    /// Creates an idle submitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a submission is awaiting the backend.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_held()
    }

    /// Runs `call` if verification permits it and nothing else is in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verification for the active method is incomplete
    /// - Another submission is outstanding
    /// - The backend call fails
    ///
    /// A backend conflict is not an error here; it is returned as
    /// `SubmissionOutcome::Conflict` for the caller to resolve.
    pub async fn submit<F, Fut>(
        &self,
        verification: &VerificationController,
        call: F,
    ) -> Result<SubmissionOutcome, WorkflowError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SubmissionOutcome, ServiceError>>,
    {
        if !verification.can_submit() {
            return Err(WorkflowError::NotVerified {
                method: verification.method(),
            });
        }

        let Some(_guard) = self.in_flight.try_acquire() else {
            warn!("Submission rejected: another submission is in flight");
            return Err(WorkflowError::SubmissionInFlight);
        };

        match call().await {
            Ok(SubmissionOutcome::Applied { count }) => {
                info!(count, method = %verification.method(), "Submission applied");
                Ok(SubmissionOutcome::Applied { count })
            }
            Ok(SubmissionOutcome::Conflict(conflict)) => {
                warn!(code = %conflict.code, message = %conflict.message, "Submission refused with conflict");
                Ok(SubmissionOutcome::Conflict(conflict))
            }
            Err(err) => {
                warn!(error = %err, "Submission failed");
                Err(WorkflowError::Service(err))
            }
        }
    }
}
