//! Weather panel
//!
//! Fetches current conditions from a local webhook. A failed fetch shows an
//! error banner that dismisses itself; it never touches the time widgets.

mod banner;
mod client;

pub use banner::{ErrorBanner, WeatherPanel};
pub use client::{Reading, WeatherClient, WeatherError, WeatherReport};
