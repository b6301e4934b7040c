//! Session state machine.

/// Lifecycle state of the read/execute loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Between commands.
    #[default]
    Idle,
    /// Waiting for a line of input.
    Reading,
    /// Running a command.
    Executing,
    /// The loop has ended and cannot be restarted.
    Terminated,
}

impl SessionState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Idle -> Reading
    /// - Reading -> Executing
    /// - Reading -> Idle (blank line)
    /// - Executing -> Idle
    /// - Idle | Reading | Executing -> Terminated
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (*self, target),
            (Idle, Reading)
                | (Reading, Executing)
                | (Reading, Idle)
                | (Executing, Idle)
                | (Idle, Terminated)
                | (Reading, Terminated)
                | (Executing, Terminated)
        )
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns `Ok(())` if the transition is valid, or an error otherwise.
    pub fn transition_to(&mut self, target: SessionState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::ShellError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminated)
    }
}
