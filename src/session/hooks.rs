//! Exit hooks.

use tracing::{debug, warn};

use crate::Result;

/// A callback run once before the shell terminates.
pub type ExitHook = Box<dyn FnOnce() -> Result<()> + Send>;

/// Ordered list of exit hooks.
#[derive(Default)]
pub struct ExitHooks {
    hooks: Vec<ExitHook>,
}

impl ExitHooks {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook.
    pub fn push(&mut self, hook: ExitHook) {
        self.hooks.push(hook);
    }

    /// Number of hooks not yet run.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Check whether no hooks are pending.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every pending hook in registration order.
    ///
    /// A failing hook is logged and does not stop the ones after it.
    /// Returns the number of hooks that failed.
    pub fn run_all(&mut self) -> usize {
        let hooks = std::mem::take(&mut self.hooks);
        let total = hooks.len();
        let mut failures = 0;

        for (index, hook) in hooks.into_iter().enumerate() {
            if let Err(e) = hook() {
                warn!(hook = index, "exit hook failed: {}", e);
                failures += 1;
            }
        }

        if total > 0 {
            debug!(total, failures, "exit hooks finished");
        }
        failures
    }
}

impl std::fmt::Debug for ExitHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExitHooks")
            .field("pending", &self.hooks.len())
            .finish()
    }
}
