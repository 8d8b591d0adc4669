//! Text tokenization for indexing and querying.
//!
//! Normalizes arbitrary text into a sequence of non-empty, bounded-length
//! tokens: transliterate to ASCII, lowercase, fold non-alphanumerics to
//! whitespace, split, truncate. Pure function — same input always yields
//! the same output.

/// Hard cap on token length. Defends the inverted index against
/// pathological inputs (base64 blobs, long URLs) rather than reflecting any
/// linguistic limit.
pub const MAX_TOKEN_LEN: usize = 48;

/// Tokenize `text` into an ordered sequence of tokens.
///
/// 1. Transliterate non-ASCII characters to ASCII approximations.
/// 2. Lowercase.
/// 3. Replace every character outside `[a-zA-Z0-9\s]` with a space.
/// 4. Split on whitespace runs, dropping empty tokens.
/// 5. Truncate any token longer than [`MAX_TOKEN_LEN`] bytes.
///
/// # Example
///
/// ```
/// use docustore::tokenizer::tokenize;
///
/// assert_eq!(tokenize("café résumé"), vec!["cafe", "resume"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let ascii = deunicode::deunicode(text);
    let lowered = ascii.to_lowercase();
    let folded: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    folded
        .split_whitespace()
        .filter(|s| !s.is_empty())
        .map(|s| truncate(s))
        .collect()
}

fn truncate(token: &str) -> String {
    if token.len() <= MAX_TOKEN_LEN {
        token.to_string()
    } else {
        token.chars().take(MAX_TOKEN_LEN).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_split_and_lowercase() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn unicode_folding() {
        assert_eq!(tokenize("café résumé"), vec!["cafe", "resume"]);
        assert_eq!(tokenize("CAFE"), vec!["cafe"]);
    }

    #[test]
    fn truncates_pathological_tokens() {
        let long = "a".repeat(200);
        let tokens = tokenize(&long);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].len(), MAX_TOKEN_LEN);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ...---...   ").is_empty());
    }

    #[test]
    fn determinism() {
        let s = "The Quick Brown Fox, Jumps! 123 fois.";
        assert_eq!(tokenize(s), tokenize(s));
    }

    #[test]
    fn bounds_hold_for_every_token() {
        let s = "a bb ccc aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        for t in tokenize(s) {
            assert!(!t.is_empty() && t.len() <= MAX_TOKEN_LEN);
            assert!(t.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }
}
