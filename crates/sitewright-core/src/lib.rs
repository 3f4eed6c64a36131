pub mod error;
pub mod model;
pub mod snapshot;
pub mod update;

pub use error::CoreError;
pub use model::{ModelSelection, ModelSource};
pub use snapshot::{FileSnapshot, SnapshotEntry};
pub use update::FileUpdate;
