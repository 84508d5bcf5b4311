//! Buffered HTTP fetching for remote image sources.

mod fetch;
pub(crate) mod response;

pub use fetch::fetch;
pub use response::Response;
