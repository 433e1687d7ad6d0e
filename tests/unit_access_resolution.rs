use frage_edu::modules::rbac::model::{AdminRole, Branch};
use frage_edu::modules::rbac::resolver::{
    default_branches, effective_permission, narrow_scope, resolve_branches,
};

#[test]
fn test_unknown_permission_denied() {
    assert!(!effective_permission(None, None));
}

#[test]
fn test_override_beats_role_default_both_ways() {
    // A role grant can be revoked per admin.
    assert!(!effective_permission(Some(false), Some(true)));
    // And a role denial can be granted per admin.
    assert!(effective_permission(Some(true), Some(false)));
}

#[test]
fn test_role_defaults_cover_every_role() {
    for role in [
        AdminRole::SuperAdmin,
        AdminRole::KinderAdmin,
        AdminRole::JuniorAdmin,
        AdminRole::MiddleAdmin,
        AdminRole::Admin,
    ] {
        assert!(!default_branches(role).is_empty());
    }
}

#[test]
fn test_super_admin_ignores_stored_assignments() {
    let resolved = resolve_branches(AdminRole::SuperAdmin, vec![Branch::Kinder]);
    assert_eq!(resolved, Branch::ALL.to_vec());
}

#[test]
fn test_branch_admin_scoped_to_own_branch_by_default() {
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
fn test_junior_admin_spans_three_branches_by_default() {
    assert_eq!(
        resolve_branches(AdminRole::JuniorAdmin, vec![]),
        vec![Branch::Junior, Branch::KinderSingle, Branch::Middle]
    );
}

#[test]
fn test_explicit_assignment_replaces_default_entirely() {
    let resolved = resolve_branches(AdminRole::JuniorAdmin, vec![Branch::Kinder]);
    assert_eq!(resolved, vec![Branch::Kinder]);
}

#[test]
fn test_requested_branch_outside_scope_yields_no_visible_set() {
    let allowed = resolve_branches(AdminRole::KinderAdmin, vec![]);
    assert_eq!(narrow_scope(&allowed, Some(Branch::Junior)), None);
}

#[test]
fn test_requested_branch_inside_scope_narrows_to_it() {
    let allowed = resolve_branches(AdminRole::JuniorAdmin, vec![]);
    assert_eq!(
        narrow_scope(&allowed, Some(Branch::Middle)),
        Some(vec![Branch::Middle])
    );
}
