mod reqwest;
mod types;


pub use crate::reqwest::*;
pub use types::*;
