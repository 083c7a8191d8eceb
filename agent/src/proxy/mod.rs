//! Proxy handlers
//!
//! Relay browser-shaped JSON requests to third-party services and reshape the
//! answers. The HTTP surface that exposes them lives in [`crate::web`].

pub mod chat;
pub mod types;
pub mod weather;

pub use chat::{ChatProxy, NO_RESPONSE_PLACEHOLDER};
pub use types::{ChatRequest, ChatResponse, ErrorResponse, WeatherRequest, WeatherResult};
pub use weather::{weather_condition, WeatherProxy, UNKNOWN_CONDITION};
