pub mod cache;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod home;
pub mod models;
pub mod resume;
pub mod search;
pub mod source;

#[cfg(test)]
mod testing;

pub use cache::ResumeCache;
pub use catalog::CatalogClient;
pub use errors::{Error, NetworkError, Result};
pub use resume::{ResumeTimeProvider, ShowProvider};
pub use source::CatalogSource;
