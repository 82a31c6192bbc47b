// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! These tests verify that tokens from `create_jwt` decode with the claims
//! the auth middleware expects, catching compatibility issues early.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use watch_activity::middleware::auth::{create_jwt, Claims};

#[test]
fn test_jwt_roundtrip() {
    let signing_key = b"test_signing_key_32_bytes_long!!";
    let user_id = 12345678u64;

    let token = create_jwt(user_id, signing_key).expect("Failed to create JWT");

    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(&token, &key, &validation).expect("Failed to decode JWT");

    assert_eq!(token_data.claims.sub, user_id.to_string());
    assert_eq!(token_data.claims.sub.parse::<u64>().unwrap(), user_id);
}

#[test]
fn test_jwt_expires_in_thirty_days() {
    let token = create_jwt(1, b"test_signing_key_32_bytes_long!!").unwrap();

    let key = DecodingKey::from_secret(b"test_signing_key_32_bytes_long!!");
    let claims = decode::<Claims>(&token, &key, &Validation::new(Algorithm::HS256))
        .unwrap()
        .claims;

    assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
}

#[test]
fn test_jwt_wrong_key_fails() {
    let token = create_jwt(1, b"test_signing_key_32_bytes_long!!").unwrap();

    let wrong_key = DecodingKey::from_secret(b"wrong_signing_key_32_bytes_long!");
    let result = decode::<Claims>(&token, &wrong_key, &Validation::new(Algorithm::HS256));

    assert!(result.is_err());
}
