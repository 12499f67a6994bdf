pub mod ollama;
pub mod openmeteo;
pub mod telegram;

pub use ollama::OllamaClient;
pub use openmeteo::OpenMeteoClient;
pub use telegram::TelegramClient;
