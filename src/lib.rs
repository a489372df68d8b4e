//! A generic, synchronous request-dispatch pipeline plus a bounded
//! concurrent content cache.
//!
//! The pipeline routes an input value to the first handler chain that claims
//! it, runs interceptors around the handler in two scopes (global and
//! chain), and recovers failures through two tiers of predicate-matched
//! exception handlers. Input and output types are caller-chosen generics;
//! nothing here assumes a transport or wire format.
//!
//! ```
//! use dispatchkit::{
//!     ChainRequestMapper, HandlerChain, HandlerError, RequestDispatcher,
//!     RequestHandler, RequestHandlerAdapter,
//! };
//!
//! struct Greet;
//!
//! impl RequestHandler<String, String> for Greet {
//!     fn can_handle(&self, input: &String) -> bool {
//!         input.starts_with("hello")
//!     }
//!
//!     fn handle(&self, input: &String) -> Result<String, HandlerError> {
//!         Ok(format!("{input}, world"))
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let chain = HandlerChain::builder().handler(Greet).build()?;
//! let mapper = ChainRequestMapper::builder().add_chain(chain).build()?;
//! let dispatcher = RequestDispatcher::builder()
//!     .add_request_mapper(mapper)
//!     .add_handler_adapter(RequestHandlerAdapter::new())
//!     .build()?;
//!
//! let output = dispatcher.dispatch("hello".to_string())?;
//! assert_eq!(output, "hello, world");
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod cache;
pub mod chain;
pub mod dispatcher;
pub mod error;
pub mod exception;
pub mod handler;
pub mod interceptor;
pub mod mapper;

pub use adapter::{HandlerAdapter, RequestHandlerAdapter};
pub use cache::{ContentCache, ContentCacheBuilder, DEFAULT_CAPACITY_BYTES, DEFAULT_TTL};
pub use chain::{HandlerChain, HandlerChainBuilder};
pub use dispatcher::{DispatcherBuilder, RequestDispatcher};
pub use error::{ConfigError, DispatchError};
pub use exception::{ExceptionHandler, ExceptionMapper, ExceptionMapperBuilder};
pub use handler::{DynRequestHandler, HandlerError, RequestHandler};
pub use interceptor::{RequestInterceptor, ResponseInterceptor};
pub use mapper::{ChainRequestMapper, ChainRequestMapperBuilder, RequestMapper};
