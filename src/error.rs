use std::fmt;

use crate::handler::HandlerError;

/// Dispatch failure taxonomy.
///
/// `dispatch` only ever returns the [`DispatchError::Unhandled`] variant; the
/// routing failures (`NoHandlerFound`, `NoAdapterFound`) surface as its
/// wrapped cause after the global exception mapper declined them. Callers
/// inspect the original failure through [`std::error::Error::source`] or by
/// downcasting the cause.
#[derive(Debug)]
pub enum DispatchError {
    /// No request mapper produced a handler chain for the input.
    NoHandlerFound,
    /// A chain was resolved but no registered adapter supports its handler.
    NoAdapterFound,
    /// Terminal wrapper: no recovery handler at any tier claimed the failure.
    Unhandled {
        /// The failure that escaped both recovery tiers.
        source: HandlerError,
    },
}

impl DispatchError {
    /// Wrap an unrecovered failure as the terminal dispatch error.
    pub fn unhandled(source: HandlerError) -> Self {
        DispatchError::Unhandled { source }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NoHandlerFound => {
                write!(f, "unable to find a suitable request handler")
            }
            DispatchError::NoAdapterFound => {
                write!(f, "unable to find a suitable handler adapter")
            }
            DispatchError::Unhandled { source } => {
                write!(f, "request dispatch failed: {source}")
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Unhandled { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Construction-time configuration error.
///
/// Returned by the chain, mapper, and dispatcher builders when a required
/// piece of the pipeline is missing. These never occur at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A handler chain was built without a handler.
    MissingHandler,
    /// A dispatcher was built with an empty request mapper registry.
    NoRequestMappers,
    /// A chain-backed request mapper was built with no handler chains.
    NoHandlerChains,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingHandler => {
                write!(f, "handler chain requires exactly one handler")
            }
            ConfigError::NoRequestMappers => {
                write!(f, "dispatcher requires at least one request mapper")
            }
            ConfigError::NoHandlerChains => {
                write!(f, "request mapper requires at least one handler chain")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
