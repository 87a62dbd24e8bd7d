//! Generative video provider integrations for Storyreel.
//!
//! # Available Providers
//!
//! - **Luma Dream Machine** - [`LumaProvider`]
//!
//! ```no_run
//! use storyreel_models::LumaProvider;
//! use storyreel_rate_limit::StoryreelConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoryreelConfig::load()?;
//! let provider = LumaProvider::from_config(&config)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod luma;

pub use luma::LumaProvider;
