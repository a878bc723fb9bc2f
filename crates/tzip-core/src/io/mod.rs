pub mod catalog;

pub use catalog::FileCatalog;
