//! Install state machine.
//!
//! `Idle → Resolving → Downloading → VerifyingIntegrity → Placing →
//! VerifyingInstall → Done`, with any failure ending in `Failed`.

use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Resolving,
    Downloading,
    VerifyingIntegrity,
    Placing,
    VerifyingInstall,
    Done,
    /// Terminal; carries the stage that failed.
    Failed(FailedStage),
}

/// Non-terminal stages a run can fail in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Idle,
    Resolving,
    Downloading,
    VerifyingIntegrity,
    Placing,
    VerifyingInstall,
}

impl Stage {
    fn order(&self) -> Option<u8> {
        match self {
            Stage::Idle => Some(0),
            Stage::Resolving => Some(1),
            Stage::Downloading => Some(2),
            Stage::VerifyingIntegrity => Some(3),
            Stage::Placing => Some(4),
            Stage::VerifyingInstall => Some(5),
            Stage::Done => Some(6),
            Stage::Failed(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed(_))
    }

    fn as_failed(&self) -> Option<FailedStage> {
        match self {
            Stage::Idle => Some(FailedStage::Idle),
            Stage::Resolving => Some(FailedStage::Resolving),
            Stage::Downloading => Some(FailedStage::Downloading),
            Stage::VerifyingIntegrity => Some(FailedStage::VerifyingIntegrity),
            Stage::Placing => Some(FailedStage::Placing),
            Stage::VerifyingInstall => Some(FailedStage::VerifyingInstall),
            Stage::Done | Stage::Failed(_) => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::Resolving => write!(f, "resolving"),
            Stage::Downloading => write!(f, "downloading"),
            Stage::VerifyingIntegrity => write!(f, "verifying integrity"),
            Stage::Placing => write!(f, "placing"),
            Stage::VerifyingInstall => write!(f, "verifying install"),
            Stage::Done => write!(f, "done"),
            Stage::Failed(stage) => write!(f, "failed while {:?}", stage),
        }
    }
}

/// Tracks the stage of one install run and the path it took.
#[derive(Debug)]
pub struct Progress {
    current: Stage,
    history: Vec<Stage>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    pub fn new() -> Self {
        Self {
            current: Stage::Idle,
            history: vec![Stage::Idle],
        }
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    /// Every stage entered so far, starting with `Idle`.
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Moves forward to `next`.
    ///
    /// Stages only move forward one step at a time; a terminal stage is never left.
    pub fn advance(&mut self, next: Stage) {
        debug_assert!(!self.current.is_terminal(), "advance from {}", self.current);
        debug_assert_eq!(
            self.current.order().map(|o| o + 1),
            next.order(),
            "{} -> {}",
            self.current,
            next
        );

        debug!("Stage: {} -> {}", self.current, next);
        if next == Stage::Done {
            info!("Install finished");
        }
        self.current = next;
        self.history.push(next);
    }

    /// Marks the run as failed in the current stage and hands `error` back.
    pub fn fail<E>(&mut self, error: E) -> E {
        if let Some(stage) = self.current.as_failed() {
            debug!("Stage: {} -> failed", self.current);
            self.current = Stage::Failed(stage);
            self.history.push(self.current);
        }
        error
    }
}
