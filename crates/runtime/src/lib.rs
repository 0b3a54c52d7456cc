pub mod frame;
pub mod gate;
pub mod scrub;
pub mod signal;

pub use frame::*;
pub use gate::*;
pub use scrub::*;
pub use signal::*;
