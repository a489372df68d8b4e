use std::sync::Arc;

use tracing::{debug, error};

use crate::adapter::HandlerAdapter;
use crate::chain::HandlerChain;
use crate::error::{ConfigError, DispatchError};
use crate::exception::ExceptionMapper;
use crate::handler::HandlerError;
use crate::interceptor::{RequestInterceptor, ResponseInterceptor};
use crate::mapper::RequestMapper;

/// Internal failure classification for the pipeline.
///
/// `Offerable` failures may still be recovered by the global exception
/// mapper. `Fatal` failures come from a recovery handler that already claimed
/// the error; they skip the global tier and surface as-is.
enum PipelineError {
    Offerable(HandlerError),
    Fatal(HandlerError),
}

/// The dispatch pipeline. See the [module docs](crate::dispatcher) for the
/// stage order and recovery tiers.
pub struct RequestDispatcher<I, O> {
    request_mappers: Vec<Arc<dyn RequestMapper<I, O>>>,
    handler_adapters: Vec<Arc<dyn HandlerAdapter<I, O>>>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor<I>>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor<I, O>>>,
    exception_mapper: Option<ExceptionMapper<I, O>>,
}

impl<I, O> RequestDispatcher<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    /// Create a builder for the dispatcher.
    pub fn builder() -> DispatcherBuilder<I, O> {
        DispatcherBuilder {
            request_mappers: Vec::new(),
            handler_adapters: Vec::new(),
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            exception_mapper: None,
        }
    }

    /// Run one input through the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Unhandled`] when a failure escapes both
    /// recovery tiers. The original cause is preserved as the error source.
    pub fn dispatch(&self, mut input: I) -> Result<O, DispatchError> {
        match self.execute_pipeline(&mut input) {
            Ok(output) => Ok(output),
            Err(PipelineError::Fatal(cause)) => {
                error!(error = %cause, "recovery handler failed while handling a claimed error");
                Err(DispatchError::unhandled(cause))
            }
            Err(PipelineError::Offerable(cause)) => {
                if let Some(mapper) = &self.exception_mapper {
                    if let Some(handler) = mapper.handler_for(&input, &cause) {
                        debug!("failure claimed by a global exception handler");
                        return handler
                            .handle(&input, &cause)
                            .map_err(DispatchError::unhandled);
                    }
                }
                error!(error = %cause, "no exception handler claimed the failure");
                Err(DispatchError::unhandled(cause))
            }
        }
    }

    fn execute_pipeline(&self, input: &mut I) -> Result<O, PipelineError> {
        for interceptor in &self.request_interceptors {
            interceptor
                .process(input)
                .map_err(PipelineError::Offerable)?;
        }

        let Some(chain) = self
            .request_mappers
            .iter()
            .find_map(|mapper| mapper.handler_chain(input))
        else {
            error!("unable to find a suitable request handler");
            return Err(PipelineError::Offerable(anyhow::Error::new(
                DispatchError::NoHandlerFound,
            )));
        };

        let Some(adapter) = self
            .handler_adapters
            .iter()
            .find(|adapter| adapter.supports(chain.handler()))
        else {
            error!("unable to find a suitable handler adapter");
            return Err(PipelineError::Offerable(anyhow::Error::new(
                DispatchError::NoAdapterFound,
            )));
        };

        match self.run_chain(input, &chain, adapter.as_ref()) {
            Ok(mut output) => {
                for interceptor in &self.response_interceptors {
                    interceptor
                        .process(input, &mut output)
                        .map_err(PipelineError::Offerable)?;
                }
                Ok(output)
            }
            Err(cause) => {
                let claimed = chain
                    .exception_handlers()
                    .iter()
                    .find(|handler| handler.can_handle(input, &cause));
                match claimed {
                    Some(handler) => {
                        debug!("failure claimed by a chain exception handler");
                        // A claiming handler's verdict is final: its output
                        // skips the global response interceptors, and a
                        // failure inside it skips the global recovery tier.
                        handler.handle(input, &cause).map_err(PipelineError::Fatal)
                    }
                    None => Err(PipelineError::Offerable(cause)),
                }
            }
        }
    }

    /// Chain-scoped stages. Everything that fails in here is offered to the
    /// chain's own exception handlers before the global tier sees it.
    fn run_chain(
        &self,
        input: &mut I,
        chain: &HandlerChain<I, O>,
        adapter: &dyn HandlerAdapter<I, O>,
    ) -> Result<O, HandlerError> {
        for interceptor in chain.request_interceptors() {
            interceptor.process(input)?;
        }
        let mut output = adapter.execute(input, chain.handler())?;
        for interceptor in chain.response_interceptors() {
            interceptor.process(input, &mut output)?;
        }
        Ok(output)
    }
}

/// Builder for [`RequestDispatcher`].
pub struct DispatcherBuilder<I, O> {
    request_mappers: Vec<Arc<dyn RequestMapper<I, O>>>,
    handler_adapters: Vec<Arc<dyn HandlerAdapter<I, O>>>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor<I>>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor<I, O>>>,
    exception_mapper: Option<ExceptionMapper<I, O>>,
}

impl<I, O> DispatcherBuilder<I, O>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    /// Append a request mapper. Mappers are consulted in the order added.
    pub fn add_request_mapper<M>(mut self, mapper: M) -> Self
    where
        M: RequestMapper<I, O> + 'static,
    {
        self.request_mappers.push(Arc::new(mapper));
        self
    }

    /// Replace the mapper list wholesale.
    pub fn with_request_mappers(mut self, mappers: Vec<Arc<dyn RequestMapper<I, O>>>) -> Self {
        self.request_mappers = mappers;
        self
    }

    /// Append a handler adapter. Adapters are probed in the order added.
    pub fn add_handler_adapter<A>(mut self, adapter: A) -> Self
    where
        A: HandlerAdapter<I, O> + 'static,
    {
        self.handler_adapters.push(Arc::new(adapter));
        self
    }

    /// Replace the adapter list wholesale.
    pub fn with_handler_adapters(mut self, adapters: Vec<Arc<dyn HandlerAdapter<I, O>>>) -> Self {
        self.handler_adapters = adapters;
        self
    }

    /// Append a global request interceptor.
    pub fn add_request_interceptor<T>(mut self, interceptor: T) -> Self
    where
        T: RequestInterceptor<I> + 'static,
    {
        self.request_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Append a global response interceptor.
    pub fn add_response_interceptor<T>(mut self, interceptor: T) -> Self
    where
        T: ResponseInterceptor<I, O> + 'static,
    {
        self.response_interceptors.push(Arc::new(interceptor));
        self
    }

    /// Install the global exception mapper.
    pub fn with_exception_mapper(mut self, mapper: ExceptionMapper<I, O>) -> Self {
        self.exception_mapper = Some(mapper);
        self
    }

    /// Finish the dispatcher.
    ///
    /// An empty adapter list is legal (every resolution then fails with
    /// [`DispatchError::NoAdapterFound`]), but at least one request mapper is
    /// required.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoRequestMappers`] if no mapper was added.
    pub fn build(self) -> Result<RequestDispatcher<I, O>, ConfigError> {
        if self.request_mappers.is_empty() {
            return Err(ConfigError::NoRequestMappers);
        }
        Ok(RequestDispatcher {
            request_mappers: self.request_mappers,
            handler_adapters: self.handler_adapters,
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
            exception_mapper: self.exception_mapper,
        })
    }
}
