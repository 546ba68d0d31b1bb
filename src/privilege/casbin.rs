use crate::core::models::user::{Capability, User};
use crate::core::ports::permission::PermissionGate;
use crate::error::Error;
use casbin::{CoreApi, DefaultModel, Enforcer, FileAdapter};

/// Role -> capability checks backed by a casbin model and policy file.
pub struct CasbinGate {
    enforcer: Enforcer,
}

impl CasbinGate {
    pub async fn new(model: &str, policy: &str) -> Result<Self, Error> {
        let model = DefaultModel::from_file(model).await?;
        let adapter = FileAdapter::new(policy.to_owned());
        let mut enforcer = Enforcer::new(model, adapter).await?;
        enforcer.enable_log(false);
        Ok(Self { enforcer })
    }
}

impl PermissionGate for CasbinGate {
    fn has_permission(&self, user: Option<&User>, capability: Capability) -> bool {
        let Some(user) = user else {
            return false;
        };
        match self.enforcer.enforce((user.role.as_str(), capability.as_str())) {
            Ok(allowed) => allowed,
            Err(e) => {
                log::error!("failed to enforce {} for user {}: {}", capability.as_str(), user.id, e);
                false
            }
        }
    }
}
