//! Request and response interceptors.
//!
//! Interceptors are pre/post hooks around handler execution. They run in
//! registration order and may mutate or wholesale replace the value they
//! receive. The dispatcher supports two scopes: global interceptors run for
//! every dispatch, chain interceptors only for the chain that resolved.
//! The scope decides which recovery tier sees an interceptor failure — see
//! [`RequestDispatcher`](crate::dispatcher::RequestDispatcher).

use crate::handler::HandlerError;

/// Hook invoked before handler execution, receiving the evolving input.
pub trait RequestInterceptor<I>: Send + Sync {
    /// Observe or transform the input. Replacing it entirely is allowed.
    fn process(&self, input: &mut I) -> Result<(), HandlerError>;
}

/// Hook invoked after handler execution, receiving the evolving output.
pub trait ResponseInterceptor<I, O>: Send + Sync {
    /// Observe or transform the output. The final input (after all request
    /// interceptors ran) is available read-only.
    fn process(&self, input: &I, output: &mut O) -> Result<(), HandlerError>;
}
