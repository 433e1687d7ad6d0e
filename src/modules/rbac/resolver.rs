//! Pure permission/branch resolution rules.
//!
//! The precedence layering (per-admin override, then role default, then fail
//! closed) lives here as plain functions so it is testable without a
//! database and applied identically at every call site.

use super::model::{AdminRole, Branch};

/// Resolves the effective grant for one admin+permission pair.
///
/// An override, when present, wins outright regardless of the role default.
/// Absence of both resolves to `false`.
pub fn effective_permission(override_value: Option<bool>, role_default: Option<bool>) -> bool {
    match override_value {
        Some(v) => v,
        None => role_default.unwrap_or(false),
    }
}

/// Fixed per-role default branch sets, used when an admin has no explicit
/// branch assignment.
pub fn default_branches(role: AdminRole) -> Vec<Branch> {
    match role {
        AdminRole::SuperAdmin => Branch::ALL.to_vec(),
        AdminRole::KinderAdmin => vec![Branch::Kinder],
        // junior_admin historically covers kinder_single and middle as well.
        AdminRole::JuniorAdmin => vec![Branch::Junior, Branch::KinderSingle, Branch::Middle],
        AdminRole::MiddleAdmin => vec![Branch::Middle],
        // Legacy bootstrap role predates branch scoping.
        AdminRole::Admin => Branch::ALL.to_vec(),
    }
}

/// Resolves the accessible-branch set from stored assignment rows.
///
/// Super admins always get the full set, whatever is stored. For other
/// roles a non-empty assignment is authoritative; an empty one falls back to
/// the role default (an explicit empty assignment is indistinguishable from
/// "never configured").
pub fn resolve_branches(role: AdminRole, assigned: Vec<Branch>) -> Vec<Branch> {
    if role == AdminRole::SuperAdmin {
        return Branch::ALL.to_vec();
    }

    if assigned.is_empty() {
        default_branches(role)
    } else {
        assigned
    }
}

/// Narrows the allowed-branch set by a caller-supplied filter.
///
/// Returns `None` when the requested branch is outside the allowed set: the
/// effective query must then return zero results rather than widen or error.
pub fn narrow_scope(allowed: &[Branch], requested: Option<Branch>) -> Option<Vec<Branch>> {
    match requested {
        None => Some(allowed.to_vec()),
        Some(b) if allowed.contains(&b) => Some(vec![b]),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_closed_without_any_grant() {
        assert!(!effective_permission(None, None));
    }

    #[test]
    fn test_role_default_applies_without_override() {
        assert!(effective_permission(None, Some(true)));
        assert!(!effective_permission(None, Some(false)));
    }

    #[test]
    fn test_override_wins_over_role_default() {
        assert!(!effective_permission(Some(false), Some(true)));
        assert!(effective_permission(Some(true), Some(false)));
        assert!(effective_permission(Some(true), None));
    }

    #[test]
    fn test_super_admin_always_full_set() {
        // Stored rows cannot narrow a super admin.
        let resolved = resolve_branches(AdminRole::SuperAdmin, vec![Branch::Kinder]);
        assert_eq!(resolved, Branch::ALL.to_vec());

        let resolved = resolve_branches(AdminRole::SuperAdmin, vec![]);
        assert_eq!(resolved, Branch::ALL.to_vec());
    }

    #[test]
    fn test_assignment_takes_full_precedence_over_default() {
        let resolved = resolve_branches(AdminRole::KinderAdmin, vec![Branch::Middle]);
        assert_eq!(resolved, vec![Branch::Middle]);
    }

    #[test]
    fn test_empty_assignment_falls_back_to_role_default() {
        assert_eq!(
            resolve_branches(AdminRole::KinderAdmin, vec![]),
            vec![Branch::Kinder]
        );
        assert_eq!(
            resolve_branches(AdminRole::MiddleAdmin, vec![]),
            vec![Branch::Middle]
        );
    }

    #[test]
    fn test_junior_admin_default_includes_middle_and_kinder_single() {
        let resolved = resolve_branches(AdminRole::JuniorAdmin, vec![]);
        assert_eq!(
            resolved,
            vec![Branch::Junior, Branch::KinderSingle, Branch::Middle]
        );
    }

    #[test]
    fn test_narrow_scope_within_allowed() {
        let allowed = vec![Branch::Kinder, Branch::Junior];
        assert_eq!(
            narrow_scope(&allowed, Some(Branch::Junior)),
            Some(vec![Branch::Junior])
        );
    }

    #[test]
    fn test_narrow_scope_outside_allowed_is_empty_result() {
        let allowed = vec![Branch::Kinder];
        assert_eq!(narrow_scope(&allowed, Some(Branch::Junior)), None);
    }

    #[test]
    fn test_narrow_scope_without_filter_keeps_allowed_set() {
        let allowed = vec![Branch::Kinder, Branch::Middle];
        assert_eq!(narrow_scope(&allowed, None), Some(allowed.clone()));
    }
}
