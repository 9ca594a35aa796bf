//! API request handlers

mod detect;
mod health;

pub use detect::*;
pub use health::*;
