use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as usize
}

/// Issues one signed token of the given kind and returns it together with
/// its claims (the refresh flow needs the jti and expiry for persistence).
pub fn issue_token(
    kind: TokenType,
    user_id: u64,
    username: String,
    role: u8,
    employee_id: Option<u64>,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let claims = Claims {
        user_id,
        sub: username,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type: kind,
        employee_id,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let (token, claims) =
            issue_token(TokenType::Access, 7, "ana".into(), 2, Some(3), "secret", 900).unwrap();

        let decoded = verify_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 7);
        assert_eq!(decoded.sub, "ana");
        assert_eq!(decoded.jti, claims.jti);
        assert_eq!(decoded.employee_id, Some(3));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let (token, _) =
            issue_token(TokenType::Access, 7, "ana".into(), 2, None, "secret", 900).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }
}
