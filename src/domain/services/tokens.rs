use rand::{distributions::Alphanumeric, Rng};

pub const RSVP_TOKEN_LEN: usize = 16;

/// Alphanumeric, so it is URL-safe as-is. Uniqueness is still enforced by the store.
pub fn generate_rsvp_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RSVP_TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub fn random_slug_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_shape() {
        let token = generate_rsvp_token();
        assert_eq!(token.len(), RSVP_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_do_not_repeat_in_practice() {
        let tokens: HashSet<String> = (0..10_000).map(|_| generate_rsvp_token()).collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn test_slug_suffix_is_lowercase() {
        let suffix = random_slug_suffix(6);
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
