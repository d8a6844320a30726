// `Stripe-Signature: t=<unix>,v1=<hex hmac>`, HMAC-SHA256 over "{t}.{raw body}".

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::models::billing::BillingEvent;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const TOLERANCE_SECONDS: i64 = 300;

pub fn verify_signature(secret: &str, payload: &[u8], header: &str, now: i64) -> Result<(), AppError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        AppError::Signature("Unable to extract timestamp and signatures from header".into())
    })?;
    if signatures.is_empty() {
        return Err(AppError::Signature("No v1 signatures found in header".into()));
    }

    let mac = signed_payload_mac(secret, timestamp, payload)?;
    let matched = signatures.iter().any(|candidate| {
        let Ok(expected) = hex::decode(candidate) else { return false };
        mac.clone().verify_slice(&expected).is_ok()
    });
    if !matched {
        return Err(AppError::Signature("No signatures found matching the expected signature for payload".into()));
    }

    if (now - timestamp).abs() > TOLERANCE_SECONDS {
        return Err(AppError::Signature("Timestamp outside the tolerance zone".into()));
    }
    Ok(())
}

pub fn construct_event(secret: &str, payload: &[u8], header: &str, now: i64) -> Result<BillingEvent, AppError> {
    verify_signature(secret, payload, header, now)?;
    serde_json::from_slice(payload)
        .map_err(|e| AppError::Signature(format!("Invalid event payload: {}", e)))
}

pub fn sign_payload(secret: &str, payload: &[u8], timestamp: i64) -> Result<String, AppError> {
    let mac = signed_payload_mac(secret, timestamp, payload)?;
    Ok(format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes())))
}

fn signed_payload_mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::InternalWithMsg(format!("Invalid webhook secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const BODY: &[u8] = br#"{"id":"evt_1","type":"customer.subscription.deleted","data":{"object":{"id":"sub_1","status":"canceled"}}}"#;

    #[test]
    fn accepts_its_own_signature() {
        let header = sign_payload(SECRET, BODY, 1_700_000_000).unwrap();
        assert!(verify_signature(SECRET, BODY, &header, 1_700_000_010).is_ok());
        let event = construct_event(SECRET, BODY, &header, 1_700_000_010).unwrap();
        assert_eq!(event.event_type, "customer.subscription.deleted");
    }

    #[test]
    fn rejects_tampering_and_wrong_secrets() {
        let header = sign_payload(SECRET, BODY, 1_700_000_000).unwrap();
        let tampered = BODY.to_vec().into_iter().map(|b| if b == b'1' { b'2' } else { b }).collect::<Vec<_>>();
        assert!(matches!(verify_signature(SECRET, &tampered, &header, 1_700_000_000), Err(AppError::Signature(_))));
        assert!(matches!(verify_signature("whsec_other", BODY, &header, 1_700_000_000), Err(AppError::Signature(_))));
    }

    #[test]
    fn rejects_stale_and_malformed_headers() {
        let header = sign_payload(SECRET, BODY, 1_700_000_000).unwrap();
        assert!(verify_signature(SECRET, BODY, &header, 1_700_000_000 + TOLERANCE_SECONDS + 1).is_err());
        assert!(verify_signature(SECRET, BODY, "garbage", 1_700_000_000).is_err());
        assert!(verify_signature(SECRET, BODY, "t=1700000000", 1_700_000_000).is_err());
        assert!(verify_signature(SECRET, BODY, "t=1700000000,v1=zz", 1_700_000_000).is_err());
    }

    #[test]
    fn any_matching_v1_entry_is_enough() {
        let valid = sign_payload(SECRET, BODY, 1_700_000_000).unwrap();
        let v1 = valid.split_once("v1=").unwrap().1;
        let header = format!("t=1700000000,v1={},v1={}", "00".repeat(32), v1);
        assert!(verify_signature(SECRET, BODY, &header, 1_700_000_000).is_ok());
    }
}
