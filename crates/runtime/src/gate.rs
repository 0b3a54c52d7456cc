/// Bootstrapping gate: holds heavy subsystems back until a fixed delay after
/// load has elapsed.
///
/// The only way to obtain a [`ReadyToken`] is through the gate opening, and
/// mounting the scene requires one, so initialization can never run before
/// the ready signal. A cancelled gate never opens.
#[derive(Debug, Clone, PartialEq)]
pub struct BootGate {
    delay_ms: f64,
    state: GateState,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GateState {
    Idle,
    Pending { deadline_ms: f64 },
    Ready,
    Cancelled,
}

/// Proof that the gate opened. Not constructible outside this module.
#[derive(Debug)]
pub struct ReadyToken {
    _private: (),
}

pub const DEFAULT_BOOT_DELAY_MS: u32 = 2000;

impl Default for BootGate {
    fn default() -> Self {
        Self::new(DEFAULT_BOOT_DELAY_MS)
    }
}

impl BootGate {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms: delay_ms as f64,
            state: GateState::Idle,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Starts the countdown. Re-arming a pending gate keeps the original
    /// deadline; a ready or cancelled gate is left untouched.
    pub fn arm(&mut self, now_ms: f64) {
        if self.state == GateState::Idle {
            self.state = GateState::Pending {
                deadline_ms: now_ms + self.delay_ms,
            };
            tracing::debug!(delay_ms = self.delay_ms, "boot gate armed");
        }
    }

    /// Clock-driven opening: yields the token once, when the deadline passes.
    pub fn poll(&mut self, now_ms: f64) -> Option<ReadyToken> {
        match self.state {
            GateState::Pending { deadline_ms } if now_ms >= deadline_ms => self.open(),
            _ => None,
        }
    }

    /// Timer-driven opening, for callers whose timer already waited the delay.
    pub fn fire(&mut self) -> Option<ReadyToken> {
        match self.state {
            GateState::Pending { .. } => self.open(),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.state, GateState::Idle | GateState::Pending { .. }) {
            self.state = GateState::Cancelled;
            tracing::debug!("boot gate cancelled");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == GateState::Ready
    }

    fn open(&mut self) -> Option<ReadyToken> {
        self.state = GateState::Ready;
        tracing::debug!("boot gate open");
        Some(ReadyToken { _private: () })
    }
}

#[cfg(test)]
mod tests {
    use super::{BootGate, GateState};

    #[test]
    fn opens_once_after_delay() {
        let mut gate = BootGate::new(2000);
        gate.arm(100.0);
        assert!(gate.poll(1500.0).is_none());
        assert!(gate.poll(2100.0).is_some());
        assert!(gate.poll(5000.0).is_none());
        assert!(gate.is_ready());
    }

    #[test]
    fn idle_gate_never_opens() {
        let mut gate = BootGate::default();
        assert!(gate.poll(1e9).is_none());
        assert!(gate.fire().is_none());
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn cancelled_gate_never_opens() {
        let mut gate = BootGate::new(10);
        gate.arm(0.0);
        gate.cancel();
        assert!(gate.poll(100.0).is_none());
        assert!(gate.fire().is_none());
        assert_eq!(gate.state(), GateState::Cancelled);
    }

    #[test]
    fn rearming_keeps_first_deadline() {
        let mut gate = BootGate::new(1000);
        gate.arm(0.0);
        gate.arm(500.0);
        assert_eq!(gate.state(), GateState::Pending { deadline_ms: 1000.0 });
    }

    #[test]
    fn cancel_after_ready_is_noop() {
        let mut gate = BootGate::new(0);
        gate.arm(0.0);
        assert!(gate.fire().is_some());
        gate.cancel();
        assert!(gate.is_ready());
    }
}
