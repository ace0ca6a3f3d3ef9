//! Run-scoped registry of solution evaluation listeners.

use crate::error::RunError;
use crate::solution::Solution;
use std::sync::Arc;

/// Observer notified after every individual evaluation.
///
/// Called synchronously on the evaluating thread. Implementations must not
/// block and only see the solution by shared reference.
pub trait SolutionEvaluationListener<R>: Send + Sync {
    /// A solution has just been evaluated.
    fn solution_evaluated_event(&self, solution: &Solution<R>);

    /// Name used in attach/detach error reports.
    fn listener_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Ordered set of listeners owned by one problem instance.
///
/// Listeners are identified by their allocation; attaching the same
/// listener twice, or detaching one that is not attached, is reported.
pub struct ListenerRegistry<R> {
    listeners: Vec<Arc<dyn SolutionEvaluationListener<R>>>,
}

impl<R> Default for ListenerRegistry<R> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<R> ListenerRegistry<R> {
    /// Appends a listener. Notification follows attachment order.
    pub fn attach(&mut self, listener: Arc<dyn SolutionEvaluationListener<R>>) -> Result<(), RunError> {
        if self.position(&listener).is_some() {
            return Err(RunError::AlreadyAttached(listener.listener_name().to_string()));
        }
        self.listeners.push(listener);
        Ok(())
    }

    /// Removes a previously attached listener.
    pub fn detach(&mut self, listener: &Arc<dyn SolutionEvaluationListener<R>>) -> Result<(), RunError> {
        match self.position(listener) {
            Some(idx) => {
                self.listeners.remove(idx);
                Ok(())
            }
            None => Err(RunError::NotAttached(listener.listener_name().to_string())),
        }
    }

    /// Notifies every listener in attachment order.
    pub fn notify(&self, solution: &Solution<R>) {
        for listener in &self.listeners {
            listener.solution_evaluated_event(solution);
        }
    }

    /// Number of attached listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is attached.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn position(&self, listener: &Arc<dyn SolutionEvaluationListener<R>>) -> Option<usize> {
        let target = Arc::as_ptr(listener) as *const ();
        self.listeners
            .iter()
            .position(|l| Arc::as_ptr(l) as *const () == target)
    }
}
