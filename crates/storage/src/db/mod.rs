mod db;
mod read;
mod schema;
mod write;


pub use db::*;
pub use read::*;
pub use write::BlockSummary;
