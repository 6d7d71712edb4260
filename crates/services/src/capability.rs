use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use assess_core::model::{Capability, PermissionState};

/// Platform boundary for acquiring environment capabilities.
///
/// Implementations probe camera and microphone by opening and immediately
/// releasing the device stream; fullscreen is entered as a live display mode
/// and stays held. A denial returns `false` — no error crosses this boundary.
#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    async fn request(&self, capability: Capability) -> bool;
}

/// Result of one capability request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityOutcome {
    Granted,
    Denied,
}

/// Tracks pre-check readiness over a capability probe.
///
/// Denied requests leave the state untouched; the gate never retries on its
/// own, the caller decides whether to re-request. The gate is discarded when
/// the pre-check phase ends — `into_state` hands the final snapshot to the
/// session.
pub struct PermissionGate {
    state: PermissionState,
    probe: Arc<dyn CapabilityProbe>,
}

impl PermissionGate {
    #[must_use]
    pub fn new(probe: Arc<dyn CapabilityProbe>) -> Self {
        Self {
            state: PermissionState::new(),
            probe,
        }
    }

    /// Attempt to acquire one capability; on success the field latches true.
    pub async fn request_capability(&mut self, capability: Capability) -> CapabilityOutcome {
        if self.probe.request(capability).await {
            self.state.grant(capability);
            CapabilityOutcome::Granted
        } else {
            CapabilityOutcome::Denied
        }
    }

    /// Set or clear the instruction acknowledgment.
    pub fn set_acknowledgment(&mut self, accepted: bool) {
        self.state.set_acknowledgment(accepted);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    #[must_use]
    pub fn state(&self) -> PermissionState {
        self.state
    }

    /// Consume the gate at phase exit, keeping the readiness snapshot.
    #[must_use]
    pub fn into_state(self) -> PermissionState {
        self.state
    }
}

impl fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionGate")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
