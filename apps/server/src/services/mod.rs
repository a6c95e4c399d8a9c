//! Service layer backing the demonstration routes

pub mod catalog;

pub use catalog::ItemCatalog;
