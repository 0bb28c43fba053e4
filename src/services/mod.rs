pub mod generation_client;
pub mod prompt;
pub mod stream;

pub use generation_client::{ChatCompletionRequest, GenerationClient};
pub use prompt::{build_trip_prompt, day_count};
