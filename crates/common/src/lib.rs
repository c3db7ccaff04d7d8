pub mod config;
pub mod game;
pub mod gameloop;
pub mod intro;
pub mod render;
pub mod world;

pub use config::{GameConfig, Repaint};
pub use game::{Game, RunState};
pub use render::{Layout, Painter, Surface};
pub use world::{Cell, Generation, Grid};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("expected a {expected_rows}x{expected_cols} grid, got {rows}x{cols}")]
    DimensionMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
