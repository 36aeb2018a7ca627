//! Browser-facing adapters: REST client, SVG rendering, console and clock.

pub mod http;
pub mod rendering;
pub mod services;
