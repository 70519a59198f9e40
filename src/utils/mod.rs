pub mod prompt;
pub mod stats;

pub use prompt::{prompt_confirm, prompt_line, read_answer};
pub use stats::StatsTimer;
