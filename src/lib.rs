pub mod models;
pub mod request;
pub mod error;
pub mod config;
pub mod urls;
pub mod options;
pub mod parameters;  // Parameter splitting (config, alteration, encoding)
pub mod parsers;
pub mod factory;
pub mod store;
pub mod pipeline;
pub mod entrypoint;
pub mod extractor;

// Re-export commonly used items
pub use models::*;
pub use request::{Header, Request};
pub use error::{ParseError, SourceError, StoreError, TemplateError, UrlError};
pub use config::*;
pub use urls::*;
pub use options::*;
pub use parameters::*;
pub use parsers::*;
pub use factory::*;
pub use store::*;
pub use pipeline::*;
pub use entrypoint::{EntrypointFinder, InsertionPoint, QueryFinder};
pub use extractor::*;
