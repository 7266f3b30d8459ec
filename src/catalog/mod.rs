//! In-memory catalog and its synchronization against the service.

mod filter;
mod item;
mod sync;

pub use filter::SweetFilter;
pub use item::{Sweet, SweetDraft};
pub use sync::CatalogSync;
