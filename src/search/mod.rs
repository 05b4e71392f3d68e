pub mod range;
pub mod results;
