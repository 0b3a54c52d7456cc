pub mod easing;
pub mod math;
pub mod time;
pub mod tween;

// Foundation crate: small, well-tested primitives only.
pub use easing::*;
pub use time::*;
pub use tween::*;
