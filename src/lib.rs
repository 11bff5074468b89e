pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod generators;
pub mod logging;
pub mod maze;
pub mod solvers;
