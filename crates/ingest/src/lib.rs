mod app;
pub mod cli;
pub mod poller;


pub use app::run;
