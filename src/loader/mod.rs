pub mod dataset;
pub mod parse;
