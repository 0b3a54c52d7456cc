#[derive(Debug, Clone, PartialEq)]
pub enum TimelineError {
    Empty,
    DuplicateId(String),
    InvalidWindow {
        id: String,
        start: f64,
        duration: f64,
    },
    InvalidExitScale {
        id: String,
        exit_scale: f64,
    },
    InvalidTotal(f64),
    InvalidSplit {
        enter: f64,
        hold: f64,
        exit: f64,
    },
}

impl std::fmt::Display for TimelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimelineError::Empty => write!(f, "timeline needs at least one section"),
            TimelineError::DuplicateId(id) => write!(f, "duplicate section id: {id}"),
            TimelineError::InvalidWindow {
                id,
                start,
                duration,
            } => write!(
                f,
                "section {id} has an invalid window (start {start}, duration {duration})"
            ),
            TimelineError::InvalidExitScale { id, exit_scale } => {
                write!(f, "section {id} has an invalid exit scale {exit_scale}")
            }
            TimelineError::InvalidTotal(total) => {
                write!(f, "total timeline length must be positive, got {total}")
            }
            TimelineError::InvalidSplit { enter, hold, exit } => write!(
                f,
                "phase split {enter}/{hold}/{exit} must be non-negative and sum to 1"
            ),
        }
    }
}

impl std::error::Error for TimelineError {}
