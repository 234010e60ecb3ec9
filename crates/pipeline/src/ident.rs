/// Random identifiers used as filename stems.
///
/// Collision probability at the default length is accepted as
/// negligible; no uniqueness check is made against storage.
use rand::Rng;

/// Default identifier length (nanoid convention).
pub const DEFAULT_LENGTH: usize = 21;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random alphanumeric identifier of `len` characters.
pub fn nano_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_matches_request() {
        for len in [0, 1, 8, DEFAULT_LENGTH, 64] {
            assert_eq!(nano_id(len).chars().count(), len);
        }
    }

    #[test]
    fn test_alphabet_membership() {
        let id = nano_id(256);
        assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_ids_differ() {
        assert_ne!(nano_id(DEFAULT_LENGTH), nano_id(DEFAULT_LENGTH));
    }
}
