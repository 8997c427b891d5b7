pub mod a001_sales_record;
pub mod a002_data_upload;
pub mod d400_sales_dashboard;
pub mod u501_import_sales_csv;
