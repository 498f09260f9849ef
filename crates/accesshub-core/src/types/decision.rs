//! Authorization decision outcomes.

use serde::{Deserialize, Serialize};

use super::id::{ModuleId, PermissionId};

/// A resolved capability: the internal identifiers behind one
/// (module name, action name) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// The module the capability belongs to.
    pub module_id: ModuleId,
    /// The permission representing the (module, action) pair.
    pub permission_id: PermissionId,
}

/// Where an allow verdict was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantSource {
    /// Permission held via a direct user grant.
    Direct,
    /// Permission held via an assigned role's grant.
    Role,
    /// Permission held only for the specific resource instance.
    Object,
}

/// The outcome of one authorization check.
///
/// Structural failures (unknown capability, missing resource token) are
/// errors, not decisions; a denial is a normal, expected outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Access is granted.
    Allow {
        /// The source of the grant.
        source: GrantSource,
    },
    /// Access is denied.
    Deny {
        /// The module name of the denied capability.
        module: String,
        /// The action name of the denied capability.
        action: String,
    },
}

impl Decision {
    /// Whether this decision grants access.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Build a denial for the given capability names.
    pub fn deny(module: &str, action: &str) -> Self {
        Self::Deny {
            module: module.to_string(),
            action: action.to_string(),
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allow { source } => write!(f, "allow ({source:?})"),
            Self::Deny { module, action } => {
                write!(f, "access denied for {module}:{action}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_display() {
        let decision = Decision::deny("article", "update");
        assert!(!decision.is_allowed());
        assert_eq!(decision.to_string(), "access denied for article:update");
    }

    #[test]
    fn test_allow_is_allowed() {
        let decision = Decision::Allow {
            source: GrantSource::Role,
        };
        assert!(decision.is_allowed());
    }
}
