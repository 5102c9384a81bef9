//! AES-256-GCM sealing of ticket tokens.

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use boxoffice_types::{
    BoxofficeError, Result, TokenKey,
    constants::{TOKEN_NONCE_LEN, TOKEN_TAG_LEN},
};

use crate::TicketClaim;

/// Seals and opens ticket tokens under one process-wide key.
///
/// Sealed layout: `nonce[12] || ciphertext || tag[16]`. The text form is the
/// standard base64 encoding of those bytes.
#[derive(Clone)]
pub struct TokenCodec {
    cipher: Aes256Gcm,
    key_fingerprint: String,
}

impl TokenCodec {
    #[must_use]
    pub fn new(key: &TokenKey) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes())),
            key_fingerprint: key.fingerprint(),
        }
    }

    /// Fingerprint of the key in use, safe to log.
    #[must_use]
    pub fn key_fingerprint(&self) -> &str {
        &self.key_fingerprint
    }

    /// Encrypt under a fresh random nonce, prepended to the output.
    ///
    /// # Errors
    /// Returns `TokenGenerationFailure` if the cipher refuses the input.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| {
                BoxofficeError::TokenGenerationFailure(format!("encryption failed: {e}"))
            })?;

        let mut sealed = Vec::with_capacity(TOKEN_NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Strip the nonce, verify the tag, and return the plaintext.
    ///
    /// # Errors
    /// - `MalformedToken` if the input is shorter than nonce + tag
    /// - `TokenRejected` if authentication fails (wrong key or tampered bytes)
    pub fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < TOKEN_NONCE_LEN + TOKEN_TAG_LEN {
            return Err(BoxofficeError::MalformedToken {
                reason: format!("token is {} bytes, too short", sealed.len()),
            });
        }
        let (nonce, ciphertext) = sealed.split_at(TOKEN_NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| BoxofficeError::TokenRejected)
    }

    /// Seal a claim into its base64 text form.
    ///
    /// # Errors
    /// Returns `TokenGenerationFailure` if encryption fails.
    pub fn seal(&self, claim: &TicketClaim) -> Result<String> {
        let sealed = self.encrypt(claim.to_plaintext().as_bytes())?;
        Ok(STANDARD.encode(sealed))
    }

    /// Decode, authenticate, and parse a token.
    ///
    /// # Errors
    /// - `MalformedToken` on bad base64, truncation, or a malformed plaintext
    /// - `TokenRejected` if authentication fails
    pub fn open(&self, token: &str) -> Result<TicketClaim> {
        let sealed = STANDARD
            .decode(token.trim())
            .map_err(|e| BoxofficeError::MalformedToken {
                reason: format!("not base64: {e}"),
            })?;
        let plaintext = self.decrypt(&sealed)?;
        let text = String::from_utf8(plaintext).map_err(|_| BoxofficeError::MalformedToken {
            reason: "plaintext is not UTF-8".to_string(),
        })?;
        TicketClaim::parse(&text)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("key", &self.key_fingerprint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use boxoffice_types::{EventId, OrderId};

    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(&TokenKey::random())
    }

    fn claim() -> TicketClaim {
        TicketClaim::new(EventId::new("ev1"), OrderId::new(), "08123456789")
    }

    #[test]
    fn seal_then_open_yields_claim() {
        let codec = codec();
        let claim = claim();
        let token = codec.seal(&claim).unwrap();
        assert!(!token.is_empty());
        assert_eq!(codec.open(&token).unwrap(), claim);
    }

    #[test]
    fn decrypt_yields_exact_plaintext() {
        let codec = codec();
        let claim = claim();
        let token = codec.seal(&claim).unwrap();
        let plaintext = codec.decrypt(&STANDARD.decode(&token).unwrap()).unwrap();
        assert_eq!(
            String::from_utf8(plaintext).unwrap(),
            format!("ev1|{}|08123456789|PAID", claim.order_id)
        );
    }

    #[test]
    fn sealed_layout_is_nonce_ciphertext_tag() {
        let codec = codec();
        let sealed = codec.encrypt(b"ev1|x|y|PAID").unwrap();
        assert_eq!(sealed.len(), TOKEN_NONCE_LEN + 12 + TOKEN_TAG_LEN);
    }

    #[test]
    fn fresh_nonce_per_token() {
        let codec = codec();
        let claim = claim();
        let a = STANDARD.decode(codec.seal(&claim).unwrap()).unwrap();
        let b = STANDARD.decode(codec.seal(&claim).unwrap()).unwrap();
        assert_ne!(a[..TOKEN_NONCE_LEN], b[..TOKEN_NONCE_LEN]);
        assert_ne!(a, b);
    }

    #[test]
    fn any_flipped_byte_is_rejected() {
        let codec = codec();
        let sealed = codec.encrypt(claim().to_plaintext().as_bytes()).unwrap();
        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            let err = codec.decrypt(&tampered).unwrap_err();
            assert!(
                matches!(err, BoxofficeError::TokenRejected),
                "byte {i} flip was accepted"
            );
        }
    }

    #[test]
    fn tampered_text_token_fails() {
        let codec = codec();
        let token = codec.seal(&claim()).unwrap();
        let mut chars: Vec<char> = token.chars().collect();
        chars[4] = if chars[4] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();
        assert!(codec.open(&tampered).is_err());
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = codec().seal(&claim()).unwrap();
        let err = codec().open(&token).unwrap_err();
        assert!(matches!(err, BoxofficeError::TokenRejected));
    }

    #[test]
    fn truncated_and_garbage_tokens_are_malformed() {
        let codec = codec();
        assert!(matches!(
            codec.decrypt(&[0u8; 10]).unwrap_err(),
            BoxofficeError::MalformedToken { .. }
        ));
        assert!(matches!(
            codec.open("***not base64***").unwrap_err(),
            BoxofficeError::MalformedToken { .. }
        ));
    }

    #[test]
    fn debug_shows_fingerprint_only() {
        let key = TokenKey::random();
        let codec = TokenCodec::new(&key);
        let shown = format!("{codec:?}");
        assert!(shown.contains(&key.fingerprint()));
        assert_eq!(codec.key_fingerprint(), key.fingerprint());
    }
}
