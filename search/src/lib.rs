pub mod config;
pub mod error;
pub mod gemini_service;
pub mod models;
pub mod post_processor;
pub mod prompt;
pub mod search_service;
pub mod validation;

pub use config::Config;
pub use error::{ErrorKind, SearchError};
pub use gemini_service::GeminiService;
pub use models::*;
pub use search_service::SearchService;
pub use validation::validate_query;
