mod rows;


pub use rows::*;
