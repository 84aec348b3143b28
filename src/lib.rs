pub mod config;
pub mod error;
pub mod io;
pub mod pooling;
pub mod problem;
pub mod scheduler;
pub mod solution;
pub mod solver;
pub mod utils;
