//! 会话鉴权桥测试：内存用户/设置存储。

use bridge_auth::{AuthorizationBridge, hash_password};
use bridge_protocol::SessionAuthorizer;
use bridge_storage::{InMemorySettingStore, InMemoryUserStore, UserRecord};
use domain::{Permission, Role};
use std::sync::Arc;

fn bridge(settings: &[(&str, &str)], users: InMemoryUserStore) -> AuthorizationBridge {
    AuthorizationBridge::new(
        Arc::new(users),
        Arc::new(InMemorySettingStore::with_settings(settings)),
    )
}

#[tokio::test]
async fn anonymous_follows_allow_flag() {
    let allowed = bridge(&[("allow_anonymous", "true")], InMemoryUserStore::new());
    let principal = allowed.authenticate(None, "").await.expect("anonymous allowed");
    assert_eq!(principal.role, Role::ReadOnly);
    assert_eq!(principal.username, "Anonymous");

    let denied = bridge(&[("allow_anonymous", "false")], InMemoryUserStore::new());
    assert!(denied.authenticate(None, "").await.is_none());

    // 缺省即拒绝
    let default = bridge(&[], InMemoryUserStore::new());
    assert!(default.authenticate(None, "").await.is_none());
}

#[tokio::test]
async fn empty_username_is_treated_as_anonymous() {
    let denied = bridge(&[("allow_anonymous", "false")], InMemoryUserStore::new());
    assert!(denied.authenticate(Some(""), "whatever").await.is_none());
}

#[tokio::test]
async fn shared_credentials_grant_admin_without_user_record() {
    let auth = bridge(
        &[("opcua_username", "scada"), ("opcua_password", "plant-5")],
        InMemoryUserStore::new(),
    );
    let principal = auth
        .authenticate(Some("scada"), "plant-5")
        .await
        .expect("shared credentials");
    assert_eq!(principal.role, Role::Admin);
    assert_eq!(principal.username, "scada");

    assert!(auth.authenticate(Some("scada"), "wrong").await.is_none());
}

#[tokio::test]
async fn stored_user_with_argon2_hash_authenticates() {
    let users = InMemoryUserStore::new();
    users.upsert(UserRecord {
        user_id: "user-7".to_string(),
        username: "operator".to_string(),
        password_hash: hash_password("s3cret").expect("hash"),
        role: "Operator".to_string(),
        enabled: true,
    });
    let auth = bridge(&[], users);

    let principal = auth
        .authenticate(Some("operator"), "s3cret")
        .await
        .expect("valid login");
    assert_eq!(principal.role, Role::Operator);

    assert!(auth.authenticate(Some("operator"), "nope").await.is_none());
    assert!(auth.authenticate(Some("ghost"), "s3cret").await.is_none());
}

#[tokio::test]
async fn legacy_plaintext_password_still_verifies() {
    let auth = bridge(&[], InMemoryUserStore::with_default_admin());
    let principal = auth
        .authenticate(Some("admin"), "admin123")
        .await
        .expect("legacy login");
    assert_eq!(principal.role, Role::Admin);
}

#[tokio::test]
async fn disabled_user_always_fails() {
    let users = InMemoryUserStore::new();
    users.upsert(UserRecord {
        user_id: "user-9".to_string(),
        username: "retired".to_string(),
        password_hash: "correct".to_string(),
        role: "Admin".to_string(),
        enabled: false,
    });
    let auth = bridge(&[], users);
    assert!(auth.authenticate(Some("retired"), "correct").await.is_none());
}

#[tokio::test]
async fn permissions_follow_role() {
    let auth = bridge(&[], InMemoryUserStore::new());

    let admin = domain::Principal::new("a", Role::Admin);
    let perms = auth.permissions(&admin);
    assert!(perms.contains(&Permission::Write));

    let viewer = domain::Principal::new("v", Role::ReadOnly);
    let perms = auth.permissions(&viewer);
    assert!(perms.contains(&Permission::Read));
    assert!(perms.contains(&Permission::Browse));
    assert!(!perms.contains(&Permission::Write));
}
