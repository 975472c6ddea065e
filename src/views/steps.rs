//! Breakdown of a file's status into the stages of the cleaning pipeline.

use crate::api::StatusKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Uploaded,
    Queued,
    Processing,
    Validation,
    Completed,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Self::Uploaded,
        Self::Queued,
        Self::Processing,
        Self::Validation,
        Self::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Uploaded => "File Uploaded",
            Self::Queued => "Queued",
            Self::Processing => "Processing",
            Self::Validation => "Validation",
            Self::Completed => "Completed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Uploaded => "File received and validated",
            Self::Queued => "Waiting for processing",
            Self::Processing => "Running data cleaning pipeline",
            Self::Validation => "Checking data quality",
            Self::Completed => "Ready for download",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepState {
    pub stage: Stage,
    pub completed: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSteps {
    pub steps: Vec<StepState>,
    pub failed: bool,
    pub status: StatusKind,
}

impl ProcessSteps {
    pub fn from_status(status: &StatusKind) -> Self {
        let done = status.is_successful();
        let processing = *status == StatusKind::Processing;
        let received = done || processing || *status == StatusKind::Uploaded;

        let steps = Stage::ALL
            .into_iter()
            .map(|stage| {
                let (completed, active) = match stage {
                    Stage::Uploaded => (received, false),
                    Stage::Queued => (done || processing, processing),
                    Stage::Processing => (done, processing),
                    Stage::Validation | Stage::Completed => (done, false),
                };
                StepState {
                    stage,
                    completed,
                    active,
                }
            })
            .collect();

        Self {
            steps,
            failed: *status == StatusKind::Failed,
            status: status.clone(),
        }
    }

    pub fn ready_for_download(&self) -> bool {
        self.steps.last().is_some_and(|step| step.completed)
    }
}
