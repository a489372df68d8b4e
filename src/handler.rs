//! Default request handler contract.
//!
//! The dispatcher itself treats handlers as opaque `dyn Any` values and only
//! talks to them through a [`HandlerAdapter`](crate::adapter::HandlerAdapter).
//! Most applications do not need that generality: they implement
//! [`RequestHandler`] and rely on the built-in
//! [`RequestHandlerAdapter`](crate::adapter::RequestHandlerAdapter) to invoke
//! it. [`DynRequestHandler`] is the concrete wrapper that makes the erased
//! handler slot recoverable by downcast.

use std::sync::Arc;

/// Opaque failure type produced by handlers, interceptors, and exception
/// handlers. Recovery predicates may downcast it to inspect the cause.
pub type HandlerError = anyhow::Error;

/// A request handler paired with its own matching predicate.
///
/// `can_handle` is consulted by [`ChainRequestMapper`](crate::mapper::ChainRequestMapper)
/// when resolving an input to a handler chain; `handle` produces the output
/// once an adapter invokes the handler.
pub trait RequestHandler<I, O>: Send + Sync {
    /// Returns true if this handler can process the given input.
    fn can_handle(&self, input: &I) -> bool;

    /// Process the input and produce an output.
    fn handle(&self, input: &I) -> Result<O, HandlerError>;
}

/// Type-erasure wrapper for [`RequestHandler`] values.
///
/// Handler chains store their handler as `Arc<dyn Any + Send + Sync>` so that
/// arbitrary handler shapes can participate via custom adapters. Handlers
/// registered through the default path are stored as this concrete type,
/// which the base adapter and base mapper recover with `downcast_ref`.
pub struct DynRequestHandler<I, O> {
    inner: Arc<dyn RequestHandler<I, O>>,
}

impl<I, O> DynRequestHandler<I, O> {
    /// Erase a concrete handler.
    pub fn new<H>(handler: H) -> Self
    where
        H: RequestHandler<I, O> + 'static,
    {
        Self {
            inner: Arc::new(handler),
        }
    }

    /// Returns true if the wrapped handler can process the given input.
    pub fn can_handle(&self, input: &I) -> bool {
        self.inner.can_handle(input)
    }

    /// Invoke the wrapped handler.
    pub fn handle(&self, input: &I) -> Result<O, HandlerError> {
        self.inner.handle(input)
    }
}

impl<I, O> Clone for DynRequestHandler<I, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
