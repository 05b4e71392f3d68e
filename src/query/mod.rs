pub mod ast;
pub mod parser;
pub mod cache;
pub mod executor;
pub mod output;
