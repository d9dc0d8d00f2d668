mod cache;
mod descriptor;
mod dump;
mod registry;
mod resolver;
mod searcher;
mod signature;

pub use cache::*;
pub use descriptor::*;
pub use dump::*;
pub use registry::*;
pub use resolver::*;
pub use searcher::*;
pub use signature::*;
