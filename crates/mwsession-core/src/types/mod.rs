//! Core site types.
//!
//! These types enforce invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod site_url;

pub use site_url::SiteUrl;
