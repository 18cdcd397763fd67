pub mod config;
pub mod error;
pub mod geometry;
pub mod mapping;
pub mod modules;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod utils;
