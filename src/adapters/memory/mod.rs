//! In-memory adapters for every persistence port.
//!
//! Used by unit and integration tests and by local runs without a
//! database (`APPROVAL_CMS__DATABASE__URL` unset).

mod store;
mod unit_of_work;

pub use store::InMemoryStore;
pub use unit_of_work::InMemoryTransaction;
