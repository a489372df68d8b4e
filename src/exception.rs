//! Predicate-based exception recovery.
//!
//! Recovery is two-tiered: each handler chain carries its own ordered list of
//! [`ExceptionHandler`]s for per-route concerns, and the dispatcher holds one
//! global [`ExceptionMapper`] consulted as a last resort for everything that
//! escapes the chain tier. Both tiers are plain first-match predicate scans;
//! there is no ranking or merging of matches.

use std::sync::Arc;

use crate::handler::HandlerError;

/// Error-recovery strategy: a predicate over (input, error) plus a recovery
/// action producing a substitute output.
pub trait ExceptionHandler<I, O>: Send + Sync {
    /// Returns true if this handler claims the failure. Once a handler
    /// claims, no other handler at any tier is consulted.
    fn can_handle(&self, input: &I, error: &HandlerError) -> bool;

    /// Produce a recovery output. A failure here is terminal: it is not
    /// offered to any further tier.
    fn handle(&self, input: &I, error: &HandlerError) -> Result<O, HandlerError>;
}

/// Ordered registry of global exception handlers.
///
/// Built once via [`ExceptionMapper::builder`] and never mutated afterwards,
/// so the dispatcher can consult it from any number of threads without
/// locking. An empty mapper simply never claims anything.
pub struct ExceptionMapper<I, O> {
    handlers: Vec<Arc<dyn ExceptionHandler<I, O>>>,
}

impl<I, O> ExceptionMapper<I, O> {
    /// Create a builder for the mapper.
    pub fn builder() -> ExceptionMapperBuilder<I, O> {
        ExceptionMapperBuilder {
            handlers: Vec::new(),
        }
    }

    /// First-match predicate scan over the registered handlers.
    pub fn handler_for(
        &self,
        input: &I,
        error: &HandlerError,
    ) -> Option<&dyn ExceptionHandler<I, O>> {
        self.handlers
            .iter()
            .find(|handler| handler.can_handle(input, error))
            .map(|handler| handler.as_ref())
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Builder for [`ExceptionMapper`].
pub struct ExceptionMapperBuilder<I, O> {
    handlers: Vec<Arc<dyn ExceptionHandler<I, O>>>,
}

impl<I, O> ExceptionMapperBuilder<I, O> {
    /// Append an exception handler. Handlers are scanned in the order added.
    pub fn add_handler<H>(mut self, handler: H) -> Self
    where
        H: ExceptionHandler<I, O> + 'static,
    {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Replace the handler list wholesale.
    pub fn with_handlers(mut self, handlers: Vec<Arc<dyn ExceptionHandler<I, O>>>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Finish the mapper. An empty handler list is valid.
    pub fn build(self) -> ExceptionMapper<I, O> {
        ExceptionMapper {
            handlers: self.handlers,
        }
    }
}
