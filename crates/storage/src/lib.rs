pub mod db;


pub use db::{Database, DBRef};
