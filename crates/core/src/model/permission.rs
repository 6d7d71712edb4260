use serde::{Deserialize, Serialize};
use std::fmt;

/// An environment capability the pre-check phase must acquire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Camera,
    Microphone,
    Fullscreen,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Camera => "camera",
            Capability::Microphone => "microphone",
            Capability::Fullscreen => "fullscreen",
        };
        write!(f, "{name}")
    }
}

/// Readiness state of the pre-check phase.
///
/// Capability fields are monotonic while the phase is active: `grant` is the
/// only way to change them and it only moves a field to `true`. The
/// acknowledgment flag may toggle freely until phase exit. The whole value is
/// discarded when the pre-check phase ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionState {
    camera: bool,
    microphone: bool,
    fullscreen: bool,
    acknowledged_instructions: bool,
}

impl PermissionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a capability as acquired.
    pub fn grant(&mut self, capability: Capability) {
        match capability {
            Capability::Camera => self.camera = true,
            Capability::Microphone => self.microphone = true,
            Capability::Fullscreen => self.fullscreen = true,
        }
    }

    #[must_use]
    pub fn is_granted(&self, capability: Capability) -> bool {
        match capability {
            Capability::Camera => self.camera,
            Capability::Microphone => self.microphone,
            Capability::Fullscreen => self.fullscreen,
        }
    }

    /// Set or clear the instruction acknowledgment. Not monotonic.
    pub fn set_acknowledgment(&mut self, accepted: bool) {
        self.acknowledged_instructions = accepted;
    }

    #[must_use]
    pub fn acknowledged_instructions(&self) -> bool {
        self.acknowledged_instructions
    }

    /// True once every capability is granted and instructions are accepted.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.camera && self.microphone && self.fullscreen && self.acknowledged_instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_requires_all_four_fields() {
        let mut state = PermissionState::new();
        assert!(!state.is_ready());

        state.grant(Capability::Camera);
        state.grant(Capability::Microphone);
        state.grant(Capability::Fullscreen);
        assert!(!state.is_ready());

        state.set_acknowledgment(true);
        assert!(state.is_ready());
    }

    #[test]
    fn acknowledgment_may_toggle_back_off() {
        let mut state = PermissionState::new();
        state.grant(Capability::Camera);
        state.grant(Capability::Microphone);
        state.grant(Capability::Fullscreen);
        state.set_acknowledgment(true);
        assert!(state.is_ready());

        state.set_acknowledgment(false);
        assert!(!state.is_ready());
    }

    #[test]
    fn grants_are_independent() {
        let mut state = PermissionState::new();
        state.grant(Capability::Microphone);

        assert!(state.is_granted(Capability::Microphone));
        assert!(!state.is_granted(Capability::Camera));
        assert!(!state.is_granted(Capability::Fullscreen));
    }
}
