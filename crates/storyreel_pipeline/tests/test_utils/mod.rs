//! Shared test utilities.

#![allow(dead_code)]

mod mock_provider;

pub use mock_provider::MockProvider;

use storyreel_core::WorkItem;

/// Scene items 1..=n with descriptions and image URLs.
pub fn scenes(n: u32) -> Vec<WorkItem> {
    (1..=n)
        .map(|i| {
            WorkItem::scene(
                i,
                format!("scene {} description", i),
                format!("https://images.example.com/{}.png", i),
            )
        })
        .collect()
}
