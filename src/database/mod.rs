pub mod db;
pub mod error;

pub use db::ConceptStore;
pub use error::{Result, StoreError};
