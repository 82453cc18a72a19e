use crate::models::Claims;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn generate_token(
    email: String,
    role: u8,
    employee_code: Option<String>,
    secret: &str,
    ttl: usize,
) -> String {
    let claims = Claims {
        sub: email,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        employee_code,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
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

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_identity() {
        let token = generate_token(
            "john.doe@gmail.com".to_string(),
            2,
            Some("TRD1042".to_string()),
            SECRET,
            3600,
        );

        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "john.doe@gmail.com");
        assert_eq!(claims.role, 2);
        assert_eq!(claims.employee_code.as_deref(), Some("TRD1042"));
    }

    #[test]
    fn admin_token_carries_no_employee_code() {
        let token = generate_token("hr@fintradify.com".to_string(), 1, None, SECRET, 3600);
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.role, 1);
        assert!(claims.employee_code.is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token("a@b.com".to_string(), 2, None, SECRET, 3600);
        assert!(verify_token(&token, "other-secret").is_err());
    }
}
