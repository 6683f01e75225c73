//! Navigation capability lookups
//!
//! The recognizer asks once per touch-start whether the implied navigation
//! is possible. Anything short of a definite "no" lets the gesture proceed.

use crate::types::{Capability, NavDirection};

/// Answers whether history navigation in a direction is currently possible
pub trait CapabilityProvider {
    fn can_navigate(&self, direction: NavDirection) -> Capability;
}

impl<P: CapabilityProvider + ?Sized> CapabilityProvider for &P {
    fn can_navigate(&self, direction: NavDirection) -> Capability {
        (**self).can_navigate(direction)
    }
}

/// Provider for environments that cannot query history at all
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownCapability;

impl CapabilityProvider for UnknownCapability {
    fn can_navigate(&self, _direction: NavDirection) -> Capability {
        Capability::Unknown
    }
}

/// Fail-open resolution: only an affirmative "impossible" blocks
pub fn permits(capability: Capability) -> bool {
    !matches!(capability, Capability::Impossible)
}
