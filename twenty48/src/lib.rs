pub use board::*;
pub use errors::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod errors;
mod persistence;
mod visualization;
