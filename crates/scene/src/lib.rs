pub mod choreographer;
pub mod error;
pub mod pointer;
pub mod registry;
pub mod scroll;
pub mod section;
pub mod snapshot;
pub mod timeline;

pub use choreographer::*;
pub use error::TimelineError;
pub use registry::SectionRegistry;
pub use section::*;
pub use snapshot::*;
pub use timeline::{Phase, PhaseSplit, Timeline, TimelineOptions};
