mod contract;
mod json;
mod model;


pub use contract::*;
pub use model::*;
