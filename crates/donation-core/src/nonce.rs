//! Anti-forgery Tokens
//!
//! The checkout form carries a token bound to the gateway action; a
//! submission whose token does not verify is rejected before any state
//! is written.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Anti-forgery token seam
pub trait NonceVerifier: Send + Sync {
    /// Issue a token for an action
    fn issue(&self, action: &str) -> String;

    /// Verify a token against an action
    fn verify(&self, nonce: &str, action: &str) -> bool;
}

/// HMAC-SHA256 token verifier keyed with a server secret
pub struct HmacNonceVerifier {
    secret: Vec<u8>,
}

impl HmacNonceVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, action: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(action.as_bytes());
        mac
    }
}

impl NonceVerifier for HmacNonceVerifier {
    fn issue(&self, action: &str) -> String {
        hex::encode(self.mac(action).finalize().into_bytes())
    }

    fn verify(&self, nonce: &str, action: &str) -> bool {
        let Ok(raw) = hex::decode(nonce) else {
            return false;
        };
        // Mac::verify_slice compares in constant time
        self.mac(action).verify_slice(&raw).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_verifies() {
        let verifier = HmacNonceVerifier::new("secret");
        let token = verifier.issue("donation-gateway");

        assert!(verifier.verify(&token, "donation-gateway"));
    }

    #[test]
    fn test_token_is_action_bound() {
        let verifier = HmacNonceVerifier::new("secret");
        let token = verifier.issue("donation-gateway");

        assert!(!verifier.verify(&token, "other-action"));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let issuer = HmacNonceVerifier::new("secret-a");
        let verifier = HmacNonceVerifier::new("secret-b");
        let token = issuer.issue("donation-gateway");

        assert!(!verifier.verify(&token, "donation-gateway"));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let verifier = HmacNonceVerifier::new("secret");

        assert!(!verifier.verify("not-hex", "donation-gateway"));
        assert!(!verifier.verify("", "donation-gateway"));
    }
}
