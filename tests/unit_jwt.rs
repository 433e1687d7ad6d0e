use frage_edu::config::jwt::JwtConfig;
use frage_edu::modules::rbac::model::AdminRole;
use frage_edu::utils::jwt::{PrincipalKind, create_admin_token, create_parent_token, verify_token};
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 86400,
    }
}

#[test]
fn test_create_parent_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let result = create_parent_token(user_id, "hh-abc123", &jwt_config);

    assert!(result.is_ok());
    let token = result.unwrap();
    assert!(!token.is_empty());
}

#[test]
fn test_verify_parent_token_claims() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_parent_token(user_id, "hh-abc123", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.kind, PrincipalKind::Parent);
    assert_eq!(claims.household_token.as_deref(), Some("hh-abc123"));
    assert!(claims.role.is_none());
}

#[test]
fn test_verify_admin_token_claims() {
    let jwt_config = get_test_jwt_config();
    let admin_id = Uuid::new_v4();

    let token = create_admin_token(admin_id, AdminRole::SuperAdmin, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, admin_id.to_string());
    assert_eq!(claims.kind, PrincipalKind::Admin);
    assert_eq!(claims.role, Some(AdminRole::SuperAdmin));
    assert!(claims.household_token.is_none());
}

#[test]
fn test_create_admin_token_all_roles() {
    let jwt_config = get_test_jwt_config();
    let admin_id = Uuid::new_v4();

    let roles = vec![
        AdminRole::SuperAdmin,
        AdminRole::KinderAdmin,
        AdminRole::JuniorAdmin,
        AdminRole::MiddleAdmin,
        AdminRole::Admin,
    ];

    for role in roles {
        let result = create_admin_token(admin_id, role, &jwt_config);
        assert!(result.is_ok());

        let claims = verify_token(&result.unwrap(), &jwt_config).unwrap();
        assert_eq!(claims.role, Some(role));
    }
}

#[test]
fn test_verify_token_invalid() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("invalid.token.here", &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let token = create_parent_token(Uuid::new_v4(), "hh-1", &jwt_config).unwrap();

    let wrong_jwt_config = JwtConfig {
        secret: "different_secret_key".to_string(),
        access_token_expiry: 86400,
    };

    let result = verify_token(&token, &wrong_jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_empty() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("", &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_malformed() {
    let jwt_config = get_test_jwt_config();
    let malformed_tokens = vec![
        "not.enough.parts",
        "too.many.parts.here.extra",
        "!!!.invalid.chars",
        "header.payload.",
        ".payload.signature",
    ];

    for token in malformed_tokens {
        let result = verify_token(token, &jwt_config);
        assert!(result.is_err());
    }
}

#[test]
fn test_token_expiry_is_set() {
    let jwt_config = get_test_jwt_config();
    let token = create_parent_token(Uuid::new_v4(), "hh-1", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert!(claims.exp > claims.iat);
    assert_eq!(
        claims.exp - claims.iat,
        jwt_config.access_token_expiry as usize
    );
}

#[test]
fn test_different_principals_different_tokens() {
    let jwt_config = get_test_jwt_config();
    let parent_id = Uuid::new_v4();
    let admin_id = Uuid::new_v4();

    let parent_token = create_parent_token(parent_id, "hh-1", &jwt_config).unwrap();
    let admin_token = create_admin_token(admin_id, AdminRole::KinderAdmin, &jwt_config).unwrap();

    assert_ne!(parent_token, admin_token);

    let parent_claims = verify_token(&parent_token, &jwt_config).unwrap();
    let admin_claims = verify_token(&admin_token, &jwt_config).unwrap();

    assert_eq!(parent_claims.sub, parent_id.to_string());
    assert_eq!(admin_claims.sub, admin_id.to_string());
}
