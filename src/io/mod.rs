pub mod config_io;
pub mod logging;
pub mod root;
pub mod store;

pub use store::{Store, StoreError};
