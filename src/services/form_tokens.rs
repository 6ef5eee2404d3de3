use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// 16 random bytes gives a 22-character url-safe token; far above the
/// guessability floor for an unauthenticated link.
const FORM_TOKEN_BYTES: usize = 16;

pub(crate) fn generate_form_token() -> String {
    let mut bytes = [0u8; FORM_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub(crate) fn form_url(public_base_url: &str, token: &str) -> String {
    format!("{}/form/{}", public_base_url.trim_end_matches('/'), token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_url_safe_and_long_enough() {
        let token = generate_form_token();
        assert_eq!(token.len(), 22);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let a = generate_form_token();
        let b = generate_form_token();
        assert_ne!(a, b);
    }

    #[test]
    fn form_url_handles_trailing_slash() {
        assert_eq!(form_url("http://x.test/", "abc"), "http://x.test/form/abc");
        assert_eq!(form_url("http://x.test", "abc"), "http://x.test/form/abc");
    }
}
