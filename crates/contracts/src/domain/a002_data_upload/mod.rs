pub mod aggregate;

pub use aggregate::DataUpload;
