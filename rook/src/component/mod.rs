//! Components: the unit of rendering and event handling.
//!
//! Implement [`Component`]; the framework and [`RouterView`](crate::router::RouterView) hold
//! components as [`AnyComponent`](traits::AnyComponent) trait objects.

pub mod traits;

pub use traits::Component;
