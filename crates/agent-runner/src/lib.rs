pub mod gemini;
pub mod runner;

pub use gemini::{GeminiClient, DEFAULT_BASE_URL};
pub use runner::GeminiRunner;
