//! Router role bindings.

mod resolver;

pub use resolver::RouterResolver;
