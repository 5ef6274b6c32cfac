use crate::config::Config;
use crate::error::AppResult;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub user_type: String,
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: String,
}

pub fn create_access_token(
    user_id: i64,
    name: &str,
    user_type: &str,
    config: &Config,
) -> AppResult<String> {
    let expiration = Utc::now() + Duration::minutes(config.security.access_token_expire_minutes);

    let claims = Claims {
        sub: user_id.to_string(),
        name: name.to_string(),
        user_type: user_type.to_string(),
        exp: expiration.timestamp(),
        token_type: "access".to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.security.secret_key.as_bytes()),
    )?;

    Ok(token)
}

pub fn create_refresh_token(config: &Config) -> (String, String, chrono::DateTime<Utc>) {
    let raw_token: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(43)
        .map(char::from)
        .collect();

    let token_hash = hash_refresh_token(&raw_token);
    let expires_at = Utc::now() + Duration::days(config.security.refresh_token_expire_days);

    (raw_token, token_hash, expires_at)
}

pub fn decode_access_token(token: &str, config: &Config) -> Option<Claims> {
    let validation = Validation::default();

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.security.secret_key.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            if data.claims.token_type == "access" {
                Some(data.claims)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex_encode(hasher.finalize())
}

fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    bytes
        .as_ref()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_round_trip() {
        let config = Config::default();
        let token = create_access_token(42, "Pasta Palace", "restaurant", &config).unwrap();

        let claims = decode_access_token(&token, &config).expect("token should decode");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.name, "Pasta Palace");
        assert_eq!(claims.user_type, "restaurant");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let config = Config::default();
        let token = create_access_token(1, "c", "customer", &config).unwrap();

        let mut other = Config::default();
        other.security.secret_key = "a-different-secret".to_string();
        assert!(decode_access_token(&token, &other).is_none());
    }

    #[test]
    fn test_refresh_token_hash_is_stable() {
        let config = Config::default();
        let (raw, hash, expires_at) = create_refresh_token(&config);

        assert_eq!(raw.len(), 43);
        assert_eq!(hash, hash_refresh_token(&raw));
        assert!(expires_at > Utc::now());
    }
}
