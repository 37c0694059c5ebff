//! Permalink derivation.
//!
//! A permalink is `{token}-{slug}`: a random base-36 token followed by the
//! lowercased title with whitespace runs collapsed to `-` and everything
//! outside `[0-9a-z-]` dropped. The token only makes collisions unlikely;
//! nothing checks uniqueness.

use rand::Rng;

/// Length of the random prefix.
pub const TOKEN_LEN: usize = 6;

/// Longest permalink the ledger accepts.
pub const MAX_PERMLINK_LEN: usize = 255;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Draw a fresh random token.
pub fn random_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Whitespace as matched by `\s` in title input, which includes the BOM.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Reduce a title to `[0-9a-z-]`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for c in title.to_lowercase().chars() {
        if is_separator(c) {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }

    slug
}

/// Join token and slug, truncating the slug to fit the ledger limit.
pub fn permalink(token: &str, title: &str) -> String {
    let mut slug = slugify(title);
    slug.truncate(MAX_PERMLINK_LEN.saturating_sub(token.len() + 1));
    format!("{}-{}", token, slug)
}
