//! Backend abstraction layer
//!
//! Provides the trait and types the render core is written against, plus
//! the headless state-tracking backend that drives tests and the demo.

pub mod headless;
pub mod traits;
pub mod types;

pub use headless::HeadlessBackend;
pub use traits::*;
pub use types::*;
