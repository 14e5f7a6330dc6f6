mod tx;


pub use tx::{BlockSummary, Tx};
