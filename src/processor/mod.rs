pub mod base;
pub mod snapshot_loader;

pub use base::*;
pub use snapshot_loader::*;
