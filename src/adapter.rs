//! Handler adapters: the calling convention seam.
//!
//! Adapters decouple the dispatcher from concrete handler shapes. Any handler
//! can participate in dispatch as long as some registered adapter's support
//! test accepts it; the dispatcher selects the first supporting adapter in
//! registration order. [`RequestHandlerAdapter`] covers the default
//! [`RequestHandler`](crate::handler::RequestHandler) contract.

use std::any::Any;
use std::marker::PhantomData;

use anyhow::anyhow;

use crate::handler::{DynRequestHandler, HandlerError};

/// Strategy that type-checks and invokes an opaque handler.
pub trait HandlerAdapter<I, O>: Send + Sync {
    /// Returns true if this adapter knows how to invoke the given handler.
    fn supports(&self, handler: &(dyn Any + Send + Sync)) -> bool;

    /// Invoke the handler with the current input.
    fn execute(&self, input: &I, handler: &(dyn Any + Send + Sync)) -> Result<O, HandlerError>;
}

/// The built-in adapter for handlers registered through the default
/// [`RequestHandler`](crate::handler::RequestHandler) contract.
pub struct RequestHandlerAdapter<I, O> {
    _marker: PhantomData<fn(&I) -> O>,
}

impl<I, O> RequestHandlerAdapter<I, O> {
    /// Create the adapter.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<I, O> Default for RequestHandlerAdapter<I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, O> HandlerAdapter<I, O> for RequestHandlerAdapter<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    fn supports(&self, handler: &(dyn Any + Send + Sync)) -> bool {
        handler.downcast_ref::<DynRequestHandler<I, O>>().is_some()
    }

    fn execute(&self, input: &I, handler: &(dyn Any + Send + Sync)) -> Result<O, HandlerError> {
        let handler = handler
            .downcast_ref::<DynRequestHandler<I, O>>()
            .ok_or_else(|| anyhow!("handler does not implement the RequestHandler contract"))?;
        handler.handle(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::RequestHandler;
    use std::sync::Arc;

    struct Upper;

    impl RequestHandler<String, String> for Upper {
        fn can_handle(&self, _input: &String) -> bool {
            true
        }

        fn handle(&self, input: &String) -> Result<String, HandlerError> {
            Ok(input.to_uppercase())
        }
    }

    #[test]
    fn supports_only_the_default_contract() {
        let adapter = RequestHandlerAdapter::<String, String>::new();
        let supported: Arc<dyn Any + Send + Sync> =
            Arc::new(DynRequestHandler::<String, String>::new(Upper));
        let unsupported: Arc<dyn Any + Send + Sync> = Arc::new("not a handler");

        assert!(adapter.supports(supported.as_ref()));
        assert!(!adapter.supports(unsupported.as_ref()));
    }

    #[test]
    fn executes_through_the_erased_slot() {
        let adapter = RequestHandlerAdapter::<String, String>::new();
        let handler: Arc<dyn Any + Send + Sync> =
            Arc::new(DynRequestHandler::<String, String>::new(Upper));

        let output = adapter
            .execute(&"ping".to_string(), handler.as_ref())
            .expect("execute");
        assert_eq!(output, "PING");
    }

    #[test]
    fn execute_on_unsupported_handler_is_an_error() {
        let adapter = RequestHandlerAdapter::<String, String>::new();
        let handler: Arc<dyn Any + Send + Sync> = Arc::new(7_i64);
        assert!(adapter
            .execute(&"ping".to_string(), handler.as_ref())
            .is_err());
    }
}
