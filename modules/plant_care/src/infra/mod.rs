pub mod catalog_csv;
pub mod photos;
pub mod storage;
