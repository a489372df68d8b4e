//! Handler chains: one handler plus its route-scoped hooks.
//!
//! A [`HandlerChain`] binds exactly one opaque handler to the request
//! interceptors, response interceptors, and exception handlers that apply
//! only when this chain resolves. Chains are assembled once through
//! [`HandlerChainBuilder`], are immutable afterwards, and are shared as
//! `Arc<HandlerChain>` across concurrent dispatches without locking.

use std::any::Any;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::exception::ExceptionHandler;
use crate::handler::{DynRequestHandler, RequestHandler};
use crate::interceptor::{RequestInterceptor, ResponseInterceptor};

/// One handler bundled with its chain-scoped interceptors and recovery
/// handlers.
///
/// The handler slot is type-erased so that arbitrary handler shapes can
/// participate: any shape is legal as long as some registered
/// [`HandlerAdapter`](crate::adapter::HandlerAdapter) supports it.
pub struct HandlerChain<I, O> {
    handler: Arc<dyn Any + Send + Sync>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor<I>>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor<I, O>>>,
    exception_handlers: Vec<Arc<dyn ExceptionHandler<I, O>>>,
}

impl<I, O> HandlerChain<I, O>
where
    I: 'static,
    O: 'static,
{
    /// Create a builder for the chain.
    pub fn builder() -> HandlerChainBuilder<I, O> {
        HandlerChainBuilder {
            handler: None,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            exception_handlers: Vec::new(),
        }
    }

    /// The erased handler reference.
    pub fn handler(&self) -> &(dyn Any + Send + Sync) {
        self.handler.as_ref()
    }

    /// Recover the handler as the default [`RequestHandler`] contract, if the
    /// chain was built through [`HandlerChainBuilder::handler`].
    pub fn typed_handler(&self) -> Option<&DynRequestHandler<I, O>> {
        self.handler.downcast_ref::<DynRequestHandler<I, O>>()
    }

    /// Chain-scoped request interceptors, in registration order.
    pub fn request_interceptors(&self) -> &[Arc<dyn RequestInterceptor<I>>] {
        &self.request_interceptors
    }

    /// Chain-scoped response interceptors, in registration order.
    pub fn response_interceptors(&self) -> &[Arc<dyn ResponseInterceptor<I, O>>] {
        &self.response_interceptors
    }

    /// Chain-scoped exception handlers, in registration order.
    pub fn exception_handlers(&self) -> &[Arc<dyn ExceptionHandler<I, O>>] {
        &self.exception_handlers
    }
}

/// Builder for [`HandlerChain`].
///
/// Exactly one handler is required; `build` fails with
/// [`ConfigError::MissingHandler`] when none was supplied.
pub struct HandlerChainBuilder<I, O> {
    handler: Option<Arc<dyn Any + Send + Sync>>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor<I>>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor<I, O>>>,
    exception_handlers: Vec<Arc<dyn ExceptionHandler<I, O>>>,
}

impl<I, O> HandlerChainBuilder<I, O>
where
    I: 'static,
    O: 'static,
{
    /// Set the handler through the default [`RequestHandler`] contract.
    ///
    /// The handler is stored as a [`DynRequestHandler`] so the built-in
    /// mapper and adapter can recover it.
    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: RequestHandler<I, O> + 'static,
    {
        self.handler = Some(Arc::new(DynRequestHandler::new(handler)));
        self
    }

    /// Set an arbitrarily shaped handler. The caller must register a
    /// [`HandlerAdapter`](crate::adapter::HandlerAdapter) that supports it.
    pub fn erased_handler(mut self, handler: Arc<dyn Any + Send + Sync>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Append a chain-scoped request interceptor.
    pub fn add_request_interceptor<T>(mut self, interceptor: T) -> Self
    where
        T: RequestInterceptor<I> + 'static,
    {
        self.request_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Append a chain-scoped response interceptor.
    pub fn add_response_interceptor<T>(mut self, interceptor: T) -> Self
    where
        T: ResponseInterceptor<I, O> + 'static,
    {
        self.response_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Append a chain-scoped exception handler.
    pub fn add_exception_handler<H>(mut self, handler: H) -> Self
    where
        H: ExceptionHandler<I, O> + 'static,
    {
        self.exception_handlers.push(Arc::new(handler));
        self
    }

    /// Finish the chain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHandler`] if no handler was set.
    pub fn build(self) -> Result<HandlerChain<I, O>, ConfigError> {
        let handler = self.handler.ok_or(ConfigError::MissingHandler)?;
        Ok(HandlerChain {
            handler,
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
            exception_handlers: self.exception_handlers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerError;

    struct Echo;

    impl RequestHandler<String, String> for Echo {
        fn can_handle(&self, _input: &String) -> bool {
            true
        }

        fn handle(&self, input: &String) -> Result<String, HandlerError> {
            Ok(input.clone())
        }
    }

    #[test]
    fn build_without_handler_fails() {
        let result = HandlerChain::<String, String>::builder().build();
        assert_eq!(result.err(), Some(ConfigError::MissingHandler));
    }

    #[test]
    fn typed_handler_roundtrip() {
        let chain = HandlerChain::<String, String>::builder()
            .handler(Echo)
            .build()
            .expect("chain");
        let handler = chain.typed_handler().expect("typed handler");
        assert!(handler.can_handle(&"hi".to_string()));
        assert_eq!(
            handler.handle(&"hi".to_string()).expect("handle"),
            "hi".to_string()
        );
    }

    #[test]
    fn erased_handler_is_opaque_to_typed_accessor() {
        let chain = HandlerChain::<String, String>::builder()
            .erased_handler(Arc::new(42_u32))
            .build()
            .expect("chain");
        assert!(chain.typed_handler().is_none());
        assert!(chain.handler().downcast_ref::<u32>().is_some());
    }
}
