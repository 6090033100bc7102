pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod sources;
pub mod types;
pub mod vessel;
pub mod week;
