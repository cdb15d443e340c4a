//! Utilities used for testing and benchmarking.

mod perft;
pub use perft::{leaves_below, run_perft};
