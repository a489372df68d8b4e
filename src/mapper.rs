//! Request-to-chain resolution.
//!
//! A [`RequestMapper`] resolves an input to a [`HandlerChain`], or declines.
//! The dispatcher queries its mappers in registration order and takes the
//! first chain produced; there is no priority or scoring beyond order.

use std::sync::Arc;

use crate::chain::HandlerChain;
use crate::error::ConfigError;

/// Strategy that resolves an input to a handler chain.
pub trait RequestMapper<I, O>: Send + Sync {
    /// Return the chain that should process `input`, or `None` to let the
    /// next registered mapper try.
    fn handler_chain(&self, input: &I) -> Option<Arc<HandlerChain<I, O>>>;
}

/// The built-in mapper: an ordered list of handler chains resolved through
/// the default handler contract.
///
/// Chains are consulted in registration order and matched by calling
/// `can_handle` on each chain's typed handler; the first accepting chain
/// wins. Chains whose handler was erased to a custom shape never match here —
/// route those through a custom [`RequestMapper`].
pub struct ChainRequestMapper<I, O> {
    chains: Vec<Arc<HandlerChain<I, O>>>,
}

impl<I, O> ChainRequestMapper<I, O>
where
    I: 'static,
    O: 'static,
{
    /// Create a builder for the mapper.
    pub fn builder() -> ChainRequestMapperBuilder<I, O> {
        ChainRequestMapperBuilder { chains: Vec::new() }
    }

    /// Number of registered chains.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns true if no chains are registered.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl<I, O> RequestMapper<I, O> for ChainRequestMapper<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    fn handler_chain(&self, input: &I) -> Option<Arc<HandlerChain<I, O>>> {
        self.chains
            .iter()
            .find(|chain| {
                chain
                    .typed_handler()
                    .is_some_and(|handler| handler.can_handle(input))
            })
            .cloned()
    }
}

/// Builder for [`ChainRequestMapper`].
pub struct ChainRequestMapperBuilder<I, O> {
    chains: Vec<Arc<HandlerChain<I, O>>>,
}

impl<I, O> ChainRequestMapperBuilder<I, O>
where
    I: 'static,
    O: 'static,
{
    /// Append a handler chain. Chains are matched in the order added.
    pub fn add_chain(mut self, chain: HandlerChain<I, O>) -> Self {
        self.chains.push(Arc::new(chain));
        self
    }

    /// Append an already shared handler chain.
    pub fn add_shared_chain(mut self, chain: Arc<HandlerChain<I, O>>) -> Self {
        self.chains.push(chain);
        self
    }

    /// Finish the mapper.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHandlerChains`] if no chain was added.
    pub fn build(self) -> Result<ChainRequestMapper<I, O>, ConfigError> {
        if self.chains.is_empty() {
            return Err(ConfigError::NoHandlerChains);
        }
        Ok(ChainRequestMapper {
            chains: self.chains,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{HandlerError, RequestHandler};

    struct PrefixHandler {
        prefix: &'static str,
    }

    impl RequestHandler<String, String> for PrefixHandler {
        fn can_handle(&self, input: &String) -> bool {
            input.starts_with(self.prefix)
        }

        fn handle(&self, _input: &String) -> Result<String, HandlerError> {
            Ok(self.prefix.to_string())
        }
    }

    fn chain_for(prefix: &'static str) -> HandlerChain<String, String> {
        HandlerChain::builder()
            .handler(PrefixHandler { prefix })
            .build()
            .expect("chain")
    }

    #[test]
    fn empty_mapper_is_a_config_error() {
        let result = ChainRequestMapper::<String, String>::builder().build();
        assert_eq!(result.err(), Some(ConfigError::NoHandlerChains));
    }

    #[test]
    fn first_registered_chain_wins() {
        let mapper = ChainRequestMapper::builder()
            .add_chain(chain_for("a"))
            .add_chain(chain_for("ab"))
            .build()
            .expect("mapper");

        let chain = mapper
            .handler_chain(&"abc".to_string())
            .expect("chain resolved");
        let handler = chain.typed_handler().expect("typed handler");
        assert_eq!(handler.handle(&"abc".to_string()).expect("handle"), "a");
    }

    #[test]
    fn no_match_returns_none() {
        let mapper = ChainRequestMapper::builder()
            .add_chain(chain_for("a"))
            .build()
            .expect("mapper");
        assert!(mapper.handler_chain(&"zzz".to_string()).is_none());
    }
}
