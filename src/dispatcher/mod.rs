//! Request dispatch pipeline.
//!
//! The dispatcher pushes each input through a fixed sequence of stages:
//!
//! 1. Global request interceptors, in registration order.
//! 2. Request mappers, first mapper to produce a chain wins.
//! 3. Handler adapters, first adapter to support the chain's handler wins.
//! 4. Chain request interceptors, handler execution, chain response
//!    interceptors.
//! 5. Global response interceptors.
//!
//! Failures are recovered in two tiers. Anything that escapes stage 4 is
//! first offered to the resolved chain's exception handlers; what they do not
//! claim, plus every failure from stages 1, 2, 3, and 5, is offered to the
//! dispatcher's global exception mapper. A failure nothing claims surfaces as
//! [`DispatchError::Unhandled`](crate::error::DispatchError::Unhandled).
//!
//! A built dispatcher is immutable and can be shared across threads behind an
//! `Arc`; each call to [`RequestDispatcher::dispatch`] is independent.

mod core;

pub use core::{DispatcherBuilder, RequestDispatcher};
