//! PKCE (RFC 7636) verifier and S256 challenge helpers.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use oauth2::{CsrfToken, PkceCodeChallenge, PkceCodeVerifier};
use sha2::{Digest, Sha256};

/// A verifier and the challenge derived from it, created once per login attempt.
#[derive(Debug)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let verifier = generate_verifier();
        let challenge = derive_challenge(&verifier);
        PkcePair {
            verifier,
            challenge,
        }
    }

    /// Generated verifiers are always 43 characters, inside the 43..=128 range oauth2 accepts.
    pub fn code_challenge(&self) -> PkceCodeChallenge {
        PkceCodeChallenge::from_code_verifier_sha256(&PkceCodeVerifier::new(self.verifier.clone()))
    }
}

/// 32 random bytes, base64url encoded without padding.
pub fn generate_verifier() -> String {
    let (_, verifier) = PkceCodeChallenge::new_random_sha256();
    verifier.secret().to_owned()
}

/// base64url(SHA-256(verifier)) without padding. Total over any input string.
pub fn derive_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Random value bound to a single authorization request.
pub fn generate_state() -> String {
    CsrfToken::new_random().secret().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_matches_rfc7636_vector() {
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        assert_eq!(
            derive_challenge(verifier),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn challenge_is_deterministic() {
        for _ in 0..16 {
            let verifier = generate_verifier();
            assert_eq!(derive_challenge(&verifier), derive_challenge(&verifier));
        }
    }

    #[test]
    fn challenge_accepts_verifiers_of_any_length() {
        let short = derive_challenge("abc");
        let long = derive_challenge(&"a".repeat(200));

        assert_eq!(short, "ungWv48Bz-pBQUDeXa4iI7ADYaOWF3qctBD_YfIAFa0");
        assert_eq!(short.len(), 43);
        assert_eq!(long.len(), 43);
        assert_eq!(derive_challenge(""), "47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU");
    }

    #[test]
    fn verifier_is_32_bytes_base64url_without_padding() {
        let verifier = generate_verifier();

        assert_eq!(verifier.len(), 43);
        assert!(verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(verifier, generate_verifier());
    }

    #[test]
    fn pair_challenge_is_derived_from_its_verifier() {
        let pair = PkcePair::generate();
        assert_eq!(pair.challenge, derive_challenge(&pair.verifier));
        assert_eq!(pair.code_challenge().as_str(), pair.challenge);
        assert_eq!(pair.code_challenge().method().as_str(), "S256");
    }

    #[test]
    fn state_is_random() {
        let state = generate_state();
        assert!(!state.is_empty());
        assert_ne!(state, generate_state());
    }
}
