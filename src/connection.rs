//! Phone link state tracking

/// Change of the phone link reported by [`LinkMonitor::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkTransition {
    /// First state ever reported
    Initial,
    /// Same state as before
    Unchanged,
    /// Link went from down to up
    Connected,
    /// Link went from up to down
    Disconnected,
}

/// Remembers the last link state to detect transitions
#[derive(Debug, Default)]
pub struct LinkMonitor {
    connected: Option<bool>,
}

impl LinkMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current link state
    pub fn update(&mut self, connected: bool) -> LinkTransition {
        let transition = match (self.connected, connected) {
            (None, _) => LinkTransition::Initial,
            (Some(false), true) => LinkTransition::Connected,
            (Some(true), false) => LinkTransition::Disconnected,
            _ => LinkTransition::Unchanged,
        };
        self.connected = Some(connected);
        transition
    }

    /// Last recorded state, `None` before the first update
    pub fn is_connected(&self) -> Option<bool> {
        self.connected
    }
}
