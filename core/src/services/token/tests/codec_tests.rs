//! Unit tests for the token wire format

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Map, Value};

use super::fixtures::{b64, codec, sign_claims, sign_segments, tamper, tamper_at, SECRET};
use crate::domain::entities::token::{ClaimSet, TokenKind};
use crate::errors::TokenError;

fn sample_claims() -> ClaimSet {
    let mut extra = Map::new();
    extra.insert("role".to_string(), json!("teacher"));
    extra.insert("school_id".to_string(), json!(17));
    ClaimSet::access(
        "u-42",
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Duration::hours(2),
        extra,
    )
    .unwrap()
}

fn valid_claims_json() -> Value {
    json!({"sub": "u-42", "typ": "access", "iat": 1_700_000_000, "exp": 1_700_007_200})
}

#[test]
fn test_encode_then_decode_returns_same_claims() {
    let codec = codec(SECRET);
    let claims = sample_claims();

    let token = codec.encode(&claims).unwrap();
    let decoded = codec.decode(&token).unwrap();

    assert_eq!(decoded, claims);
    assert_eq!(decoded.extra.get("role"), Some(&json!("teacher")));
    assert_eq!(decoded.typ, TokenKind::Access);
    assert_eq!(decoded.jti, None);
}

#[test]
fn test_encode_is_deterministic_and_url_safe() {
    let codec = codec(SECRET);
    let claims = sample_claims();

    let first = codec.encode(&claims).unwrap();
    let second = codec.encode(&claims).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.split('.').count(), 3);
    assert!(first
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));
}

#[test]
fn test_header_names_hs256() {
    let token = codec(SECRET).encode(&sample_claims()).unwrap();
    let header_segment = token.split('.').next().unwrap();
    let header: Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header_segment).unwrap()).unwrap();

    assert_eq!(header["alg"], "HS256");
    assert_eq!(header["typ"], "JWT");
}

#[test]
fn test_refresh_claims_carry_token_id() {
    let codec = codec(SECRET);
    let claims = ClaimSet::refresh("u-42", "tid-1", Utc::now(), Duration::hours(48)).unwrap();

    let decoded = codec.decode(&codec.encode(&claims).unwrap()).unwrap();

    assert_eq!(decoded.typ, TokenKind::Refresh);
    assert_eq!(decoded.jti.as_deref(), Some("tid-1"));
    assert!(decoded.extra.is_empty());
}

#[test]
fn test_empty_input() {
    let codec = codec(SECRET);

    assert_eq!(codec.decode(""), Err(TokenError::EmptyToken));
    assert_eq!(codec.decode("   \t"), Err(TokenError::EmptyToken));
}

#[test]
fn test_wrong_segment_count_is_malformed() {
    let codec = codec(SECRET);
    let token = codec.encode(&sample_claims()).unwrap();
    let trailing_dot = format!("{}.", token);

    for input in [
        "abc",
        "abc.def",
        "a.b.c.d",
        "..",
        "abc..def",
        trailing_dot.as_str(),
    ] {
        assert!(
            matches!(codec.decode(input), Err(TokenError::Malformed { .. })),
            "input {:?} should be malformed",
            input
        );
    }
}

#[test]
fn test_bad_header_is_malformed() {
    let codec = codec(SECRET);
    let claims = b64(&valid_claims_json());

    let not_base64 = sign_segments("!!!", &claims, SECRET);
    let not_json = sign_segments(&URL_SAFE_NO_PAD.encode("not json"), &claims, SECRET);
    let other_alg = sign_segments(&b64(&json!({"alg": "HS512", "typ": "JWT"})), &claims, SECRET);
    let no_alg = sign_segments(&b64(&json!({"alg": "none"})), &claims, SECRET);

    for token in [not_base64, not_json, other_alg, no_alg] {
        assert!(matches!(codec.decode(&token), Err(TokenError::Malformed { .. })));
    }
}

#[test]
fn test_every_changed_character_is_detected() {
    let codec = codec(SECRET);
    let token = codec.encode(&sample_claims()).unwrap();
    let segments: Vec<&str> = token.split('.').collect();

    for index in [1, 2] {
        for position in 0..segments[index].len() {
            let altered = tamper_at(&token, index, position);
            assert_eq!(
                codec.decode(&altered),
                Err(TokenError::BadSignature),
                "segment {} position {}",
                index,
                position
            );
        }
    }

    // 32 signature bytes leave two unused bits in the final character
    let last = segments[2].len() - 1;
    assert_eq!(last, 42);
    assert_eq!(
        codec.decode(&tamper_at(&token, 2, last)),
        Err(TokenError::BadSignature)
    );
}

#[test]
fn test_tampering_is_detected() {
    let codec = codec(SECRET);
    let token = codec.encode(&sample_claims()).unwrap();

    assert_eq!(codec.decode(&tamper(&token, 1)), Err(TokenError::BadSignature));
    assert_eq!(codec.decode(&tamper(&token, 2)), Err(TokenError::BadSignature));

    // A valid but different header is still covered by the signature
    let mut segments: Vec<&str> = token.split('.').collect();
    let other_header = b64(&json!({"alg": "HS256", "typ": "JWT", "kid": "k1"}));
    segments[0] = other_header.as_str();
    assert_eq!(codec.decode(&segments.join(".")), Err(TokenError::BadSignature));
}

#[test]
fn test_other_secret_is_bad_signature() {
    let token = codec("another-secret-entirely-0123456789ab")
        .encode(&sample_claims())
        .unwrap();

    assert_eq!(codec(SECRET).decode(&token), Err(TokenError::BadSignature));
}

#[test]
fn test_swapped_claims_segment_is_bad_signature() {
    let codec = codec(SECRET);
    let token = codec.encode(&sample_claims()).unwrap();
    let forged_claims = b64(&json!({"sub": "admin", "typ": "access", "iat": 1, "exp": i64::MAX}));

    let segments: Vec<&str> = token.split('.').collect();
    let forged = format!("{}.{}.{}", segments[0], forged_claims, segments[2]);

    assert_eq!(codec.decode(&forged), Err(TokenError::BadSignature));
}

#[test]
fn test_claims_that_are_not_an_object_are_malformed() {
    let codec = codec(SECRET);
    let header = b64(&json!({"alg": "HS256", "typ": "JWT"}));

    let not_base64 = sign_segments(&header, "***", SECRET);
    let not_json = sign_segments(&header, &URL_SAFE_NO_PAD.encode("hello"), SECRET);
    let array = sign_claims(&json!([1, 2, 3]), SECRET);

    for token in [not_base64, not_json, array] {
        assert!(matches!(codec.decode(&token), Err(TokenError::Malformed { .. })));
    }
}

#[test]
fn test_missing_required_claims() {
    let codec = codec(SECRET);

    for claim in ["sub", "typ", "iat", "exp"] {
        let mut claims = valid_claims_json();
        claims.as_object_mut().unwrap().remove(claim);
        let token = sign_claims(&claims, SECRET);

        assert_eq!(
            codec.decode(&token),
            Err(TokenError::MissingClaim {
                claim: claim.to_string()
            })
        );
    }
}

#[test]
fn test_empty_or_null_subject_is_missing() {
    let codec = codec(SECRET);
    let mut claims = valid_claims_json();

    claims["sub"] = json!("");
    assert_eq!(
        codec.decode(&sign_claims(&claims, SECRET)),
        Err(TokenError::MissingClaim {
            claim: "sub".to_string()
        })
    );

    claims["sub"] = Value::Null;
    assert_eq!(
        codec.decode(&sign_claims(&claims, SECRET)),
        Err(TokenError::MissingClaim {
            claim: "sub".to_string()
        })
    );
}

#[test]
fn test_ill_typed_claims_are_malformed() {
    let codec = codec(SECRET);

    for (claim, value) in [
        ("sub", json!(42)),
        ("typ", json!("session")),
        ("iat", json!("yesterday")),
        ("exp", json!(1.5)),
        ("jti", json!(7)),
    ] {
        let mut claims = valid_claims_json();
        claims[claim] = value;
        let token = sign_claims(&claims, SECRET);

        assert!(
            matches!(codec.decode(&token), Err(TokenError::Malformed { .. })),
            "ill-typed {} should be malformed",
            claim
        );
    }
}

#[test]
fn test_garbage_never_panics() {
    let codec = codec(SECRET);
    let inputs = [
        ".",
        "...",
        "\u{0}.\u{0}.\u{0}",
        "ÿ.ÿ.ÿ",
        "eyJ.eyJ.eyJ",
        "Bearer abc.def.ghi",
        "a.b.c",
    ];

    for input in inputs {
        assert!(codec.decode(input).is_err());
    }
}

#[test]
fn test_errors_do_not_contain_secret() {
    let codec = codec(SECRET);
    let mut claims = valid_claims_json();
    claims["iat"] = json!("bad");

    let err = codec.decode(&sign_claims(&claims, SECRET)).unwrap_err();

    assert!(!err.to_string().contains(SECRET));
}
