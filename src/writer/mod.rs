pub mod catalog_builder;
