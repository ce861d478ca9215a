//! Restricted-role sets loaded from configuration.

use std::collections::HashSet;

use larder_core::config::auth::AuthConfig;
use larder_core::error::AppError;
use larder_entity::account::GlobalRole;
use larder_entity::membership::GroupRole;

/// Which roles are denied mutation-class actions.
#[derive(Debug, Clone, Default)]
pub struct RolePolicy {
    restricted_global: HashSet<GlobalRole>,
    restricted_group: HashSet<GroupRole>,
}

impl RolePolicy {
    /// Build from configuration. Unknown role names are a configuration error.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let restricted_global = config
            .restricted_global_roles
            .iter()
            .map(|r| r.parse::<GlobalRole>())
            .collect::<Result<HashSet<_>, _>>()
            .map_err(|e| {
                AppError::configuration(format!("auth.restricted_global_roles: {}", e.message))
            })?;

        let restricted_group = config
            .restricted_group_roles
            .iter()
            .map(|r| r.parse::<GroupRole>())
            .collect::<Result<HashSet<_>, _>>()
            .map_err(|e| {
                AppError::configuration(format!("auth.restricted_group_roles: {}", e.message))
            })?;

        Ok(Self {
            restricted_global,
            restricted_group,
        })
    }

    pub fn new(
        restricted_global: impl IntoIterator<Item = GlobalRole>,
        restricted_group: impl IntoIterator<Item = GroupRole>,
    ) -> Self {
        Self {
            restricted_global: restricted_global.into_iter().collect(),
            restricted_group: restricted_group.into_iter().collect(),
        }
    }

    pub fn is_restricted_global(&self, role: GlobalRole) -> bool {
        self.restricted_global.contains(&role)
    }

    pub fn is_restricted_group(&self, role: GroupRole) -> bool {
        self.restricted_group.contains(&role)
    }
}
