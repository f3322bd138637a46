//! Input discovery
//!
//! Walks the input path and classifies every regular file by extension.

pub mod scanner;

pub use scanner::scan;
