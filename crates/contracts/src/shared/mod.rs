pub mod date_utils;
pub mod sales_filter;
