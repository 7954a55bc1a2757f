//! Types shared by the repository and HTTP layers.

pub mod pagination;

pub use pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE, PageMeta, PageRequest, PageResponse};
