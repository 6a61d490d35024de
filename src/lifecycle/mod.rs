//! Lifecycle controller: guarded state machine over a pipeline definition.
//!
//! | From          | Action | Guard           | To     |
//! |---------------|--------|-----------------|--------|
//! | draft         | deploy | validation clean| active |
//! | active        | pause  |                 | paused |
//! | active        | fail   |                 | failed |
//! | paused/failed | resume | validation clean| active |
//! | paused/failed | edit   |                 | draft  |
//!
//! The controller never touches the graph; edits go through the graph
//! model while the pipeline is `draft` or `paused`.

use serde::{Deserialize, Serialize};

use crate::config::ValidatorConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::PipelineDefinition;
use crate::validate::{self, ValidationReport};

const TRACING_TARGET: &str = "pipeline_model::lifecycle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleState {
    Draft,
    Active,
    Paused,
    Failed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Draft => write!(f, "draft"),
            LifecycleState::Active => write!(f, "active"),
            LifecycleState::Paused => write!(f, "paused"),
            LifecycleState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleAction {
    Deploy,
    Pause,
    /// Runtime failure signal from whatever executes the pipeline.
    Fail,
    Resume,
    Edit,
}

impl std::fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleAction::Deploy => write!(f, "deploy"),
            LifecycleAction::Pause => write!(f, "pause"),
            LifecycleAction::Fail => write!(f, "fail"),
            LifecycleAction::Resume => write!(f, "resume"),
            LifecycleAction::Edit => write!(f, "edit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub target: LifecycleState,
    /// Whether the pipeline must validate cleanly first.
    pub guarded: bool,
}

/// The transition table. `None` for undefined (state, action) pairs.
pub fn transition(state: LifecycleState, action: LifecycleAction) -> Option<Transition> {
    use LifecycleAction::*;
    use LifecycleState::*;

    let (target, guarded) = match (state, action) {
        (Draft, Deploy) => (Active, true),
        (Active, Pause) => (Paused, false),
        (Active, Fail) => (Failed, false),
        (Paused | Failed, Resume) => (Active, true),
        (Paused | Failed, Edit) => (Draft, false),
        _ => return None,
    };
    Some(Transition { target, guarded })
}

/// Whether the graph model accepts mutations in `state`.
pub fn is_editable(state: LifecycleState) -> bool {
    matches!(state, LifecycleState::Draft | LifecycleState::Paused)
}

impl PipelineDefinition {
    /// Attempt `action`.
    ///
    /// Guarded transitions return the (clean) validation report, which may
    /// still carry warnings; unguarded ones return an empty report. On any
    /// failure the state and revision are unchanged.
    pub fn apply(
        &mut self,
        action: LifecycleAction,
        config: &ValidatorConfig,
    ) -> Result<ValidationReport> {
        let from = self.state();
        let Some(step) = transition(from, action) else {
            return Err(PipelineError::InvalidTransition {
                state: from,
                action,
            });
        };

        let report = if step.guarded {
            let report = validate::validate_with(self, config);
            if !report.is_valid() {
                tracing::warn!(
                    target: TRACING_TARGET,
                    pipeline_id = %self.id(),
                    action = %action,
                    errors = report.errors().count(),
                    "Transition rejected by validation"
                );
                return Err(PipelineError::ValidationFailed(report));
            }
            report
        } else {
            ValidationReport::default()
        };

        self.set_state(step.target);
        tracing::debug!(
            target: TRACING_TARGET,
            pipeline_id = %self.id(),
            from = %from,
            to = %step.target,
            action = %action,
            revision = self.revision(),
            "Lifecycle transition"
        );

        Ok(report)
    }

    pub fn deploy(&mut self) -> Result<ValidationReport> {
        self.apply(LifecycleAction::Deploy, &ValidatorConfig::default())
    }

    pub fn deploy_with(&mut self, config: &ValidatorConfig) -> Result<ValidationReport> {
        self.apply(LifecycleAction::Deploy, config)
    }

    pub fn pause(&mut self) -> Result<()> {
        self.apply(LifecycleAction::Pause, &ValidatorConfig::default())?;
        Ok(())
    }

    /// Record a runtime failure of an active pipeline.
    pub fn fail(&mut self) -> Result<()> {
        self.apply(LifecycleAction::Fail, &ValidatorConfig::default())?;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<ValidationReport> {
        self.apply(LifecycleAction::Resume, &ValidatorConfig::default())
    }

    pub fn resume_with(&mut self, config: &ValidatorConfig) -> Result<ValidationReport> {
        self.apply(LifecycleAction::Resume, config)
    }

    /// Return a paused or failed pipeline to draft for editing.
    pub fn edit(&mut self) -> Result<()> {
        self.apply(LifecycleAction::Edit, &ValidatorConfig::default())?;
        Ok(())
    }
}
