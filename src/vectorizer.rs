//! Term-frequency vectorization.

use crate::tokenizer::tokenize;
use std::collections::HashMap;

/// Result of vectorizing a document or query: relative term frequencies
/// plus the precomputed squared norm of the frequency vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    /// token -> relative frequency in `[0, 1]`.
    pub term_freqs: HashMap<String, f64>,
    /// `sum(term_freqs[t]^2)` over all terms.
    pub square_norm: f64,
}

/// Tokenize `text` and compute its term-frequency vector and squared norm.
///
/// Empty input yields an empty `term_freqs` map and a norm of `0.0`.
pub fn vectorize(text: &str) -> TermVector {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return TermVector::default();
    }

    let mut counts: HashMap<String, u64> = HashMap::new();
    for token in &tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }

    let n_tokens = tokens.len() as f64;
    let mut term_freqs = HashMap::with_capacity(counts.len());
    let mut square_norm = 0.0;
    for (token, count) in counts {
        let freq = count as f64 / n_tokens;
        square_norm += freq * freq;
        term_freqs.insert(token, freq);
    }

    TermVector {
        term_freqs,
        square_norm,
    }
}
