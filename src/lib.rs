// Library surface for headless/integration tests and reuse.
// The binary only adds terminal setup and the CLI on top of this.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod score;
pub mod session;
pub mod ui;
pub mod view;
pub mod word_source;

pub use error::{TypingError, TypingResult};
