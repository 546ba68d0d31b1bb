use crate::core::models::user::{Capability, User};

pub trait PermissionGate {
    /// An absent user never has a capability.
    fn has_permission(&self, user: Option<&User>, capability: Capability) -> bool;
}
