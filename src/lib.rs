pub mod cell_format;
pub mod column_plan;
pub mod feed;
pub mod http_client;
pub mod search_filter;
pub mod sheet_decode;
pub mod sheet_fetch;
pub mod sources;
pub mod standings_sort;
pub mod state;
pub mod table_view;
