//! Bundled converter plugins for well-known cross-cutting types.
//!
//! Each plugin claims a specific schema type by owning file, package and
//! name, substitutes a target-surface-native type for it, and emits
//! hand-written conversion statements instead of the generated
//! import/export pattern. Register the ones you need on the
//! [`ConverterSet`](crate::ConverterSet); registration order is probe order.

pub mod json;
pub mod time;
pub mod uuid;

pub use json::JsonObjectPlugin;
pub use time::{DurationPlugin, TimestampPlugin};
pub use uuid::UuidPlugin;
