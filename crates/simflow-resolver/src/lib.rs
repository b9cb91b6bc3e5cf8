mod error;
mod registry;
mod resolver;

pub use error::ResolveError;
pub use registry::{ActorFactory, ActorRegistry, StandardRegistry};
pub use resolver::{Resolver, StandardResolver};
