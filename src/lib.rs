pub mod archive;
pub mod config;
pub mod credential;
pub mod encoding;
pub mod engine;
pub mod export;
pub mod extract;
pub mod format;
pub mod io;
pub mod normalize;
pub mod progress;
pub mod prompt;
pub mod report;
pub mod stats;
pub mod store;
