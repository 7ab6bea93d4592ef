use jsonwebtoken::{encode, EncodingKey, Header};
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::error::Result;
use crate::middleware::auth::Claims;

pub fn generate_room_code(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Signs an HS256 bearer token whose subject is the candidate id.
pub fn issue_candidate_token(candidate_id: &str, secret: &str, ttl: chrono::Duration) -> Result<String> {
    let exp = (chrono::Utc::now() + ttl).timestamp().max(0) as usize;
    let claims = Claims {
        sub: candidate_id.to_string(),
        exp,
        role: Some("candidate".to_string()),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}
