use chrono::{Duration, Utc};
use clutterscore_api::auth::models::JwtClaims;
use jsonwebtoken::{encode, EncodingKey, Header};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// A signed-in user of one organization
pub struct TestUser {
    pub tenant_id: String,
    pub user_id: String,
    pub email: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub fn sign_claims(claims: &JwtClaims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn claims_for(tenant_id: &str, user_id: &str, email: &str) -> JwtClaims {
    let now = Utc::now();
    JwtClaims {
        sub: user_id.to_string(),
        tenant_id: tenant_id.to_string(),
        email: email.to_string(),
        role: "admin".to_string(),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
        nbf: None,
    }
}

pub fn test_user(tenant_id: &str) -> TestUser {
    let user_id = format!("user-{}", tenant_id);
    let email = format!("admin@{}.example.com", tenant_id);
    let token = sign_claims(&claims_for(tenant_id, &user_id, &email));
    TestUser {
        tenant_id: tenant_id.to_string(),
        user_id,
        email,
        token,
    }
}
