pub mod aggregate;
pub mod list_query;

pub use aggregate::{SalesRecord, SalesRecordId, SalesRecordListResponse};
pub use list_query::{RecordListQuery, SortDirection, SortField};
