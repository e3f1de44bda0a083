//! Field-level parsing helpers shared by the source adapters
//!
//! - [`sanitize`] reduces provider HTML to plain text
//! - [`date`] reads the many publication date formats providers emit

pub mod date;
pub mod sanitize;

pub use date::parse_published_at;
pub use sanitize::strip_markup;
