use crate::protocol::ByteLanes;

/// Registered falling-edge detector over stream lane validity.
///
/// Starts with every lane low, so the first sample can never report a fall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallingEdge {
    previous: ByteLanes,
}

impl FallingEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if any lane high last step is low in `current`.
    pub fn detected(&self, current: ByteLanes) -> bool {
        current.fell_from(self.previous).any()
    }

    pub fn clock(&mut self, current: ByteLanes) {
        self.previous = current;
    }
}
