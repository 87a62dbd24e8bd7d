//! Luma Dream Machine provider.

mod client;

pub use client::LumaProvider;
