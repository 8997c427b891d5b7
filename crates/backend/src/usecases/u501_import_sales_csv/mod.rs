pub mod executor;

pub use executor::{execute, execute_exclusive, ImportError, ImportOutcome, UploadedFile};
