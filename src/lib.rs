// Library interface for the binary and tests
pub mod algorithms;
pub mod chain;
pub mod cli;
pub mod config;
pub mod header;
pub mod node;
pub mod pipeline;
pub mod report;
pub mod stats;
