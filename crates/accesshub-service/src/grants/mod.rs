//! Grant administration services and the shared bulk-assign policy.

mod membership;
mod object;
mod role;
mod user;

pub use membership::MembershipService;
pub use object::ObjectGrantService;
pub use role::RoleGrantService;
pub use user::UserGrantService;

use std::collections::HashSet;

use accesshub_core::error::AppError;
use accesshub_core::result::AppResult;
use accesshub_core::types::PermissionId;

/// Bulk-assign overlap policy, shared by every grant store.
///
/// Returns the requested identifiers that are not already granted, in
/// request order with duplicates removed. When every requested identifier
/// is already present the whole call fails with `AlreadyGranted`; a
/// partial overlap silently narrows to the fresh subset.
pub fn select_fresh(
    requested: &[PermissionId],
    existing: &HashSet<PermissionId>,
) -> AppResult<Vec<PermissionId>> {
    if requested.is_empty() {
        return Err(AppError::validation("No permissions requested"));
    }

    let mut seen = HashSet::new();
    let fresh: Vec<PermissionId> = requested
        .iter()
        .copied()
        .filter(|id| seen.insert(*id) && !existing.contains(id))
        .collect();

    if fresh.is_empty() {
        return Err(AppError::already_granted(
            "All requested permissions are already granted",
        ));
    }
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accesshub_core::error::ErrorKind;

    #[test]
    fn test_select_fresh_all_new() {
        let a = PermissionId::new();
        let b = PermissionId::new();
        let fresh = select_fresh(&[a, b], &HashSet::new()).unwrap();
        assert_eq!(fresh, vec![a, b]);
    }

    #[test]
    fn test_select_fresh_partial_overlap_narrows() {
        let a = PermissionId::new();
        let b = PermissionId::new();
        let c = PermissionId::new();
        let existing = HashSet::from([a]);
        let fresh = select_fresh(&[a, b, c], &existing).unwrap();
        assert_eq!(fresh, vec![b, c]);
    }

    #[test]
    fn test_select_fresh_full_overlap_is_already_granted() {
        let a = PermissionId::new();
        let b = PermissionId::new();
        let existing = HashSet::from([a, b]);
        let err = select_fresh(&[a, b], &existing).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyGranted);
    }

    #[test]
    fn test_select_fresh_dedupes_request() {
        let a = PermissionId::new();
        let fresh = select_fresh(&[a, a, a], &HashSet::new()).unwrap();
        assert_eq!(fresh, vec![a]);
    }

    #[test]
    fn test_select_fresh_empty_request_is_validation_error() {
        let err = select_fresh(&[], &HashSet::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
