//! Core traits for identifier resolution.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
