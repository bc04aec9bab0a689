//! Phonetic keys for "did you mean" suggestions.
//!
//! Suggestions never dispatch anything; they are computed only after an
//! exact-match lookup has failed.

use std::collections::HashMap;

use crate::registry::CommandRegistry;

/// A deterministic phonetic key function. The same function must be used for
/// the stored alias index and the query term.
pub type PhoneticKey = fn(&str) -> Option<String>;

/// American Soundex: the uppercased first letter plus three digits.
///
/// Characters outside ASCII letters are ignored; adjacent letters mapping to
/// the same digit collapse to one, with `h`/`w` transparent between them.
/// Returns `None` when the input contains no letters at all.
pub fn soundex(input: &str) -> Option<String> {
    let mut letters = input.chars().filter(|c| c.is_ascii_alphabetic());
    let first = letters.next()?;

    let mut code = String::with_capacity(4);
    code.push(first.to_ascii_uppercase());
    let mut prev = digit_for(first);

    for ch in letters {
        let digit = digit_for(ch);
        if digit != 0 && digit != prev {
            code.push(char::from(b'0' + digit));
            if code.len() == 4 {
                break;
            }
        }
        // h and w do not separate letters of the same code.
        if !matches!(ch.to_ascii_lowercase(), 'h' | 'w') {
            prev = digit;
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    Some(code)
}

fn digit_for(ch: char) -> u8 {
    match ch.to_ascii_lowercase() {
        'b' | 'f' | 'p' | 'v' => 1,
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => 2,
        'd' | 't' => 3,
        'l' => 4,
        'm' | 'n' => 5,
        'r' => 6,
        _ => 0,
    }
}

/// Alias groups keyed by phonetic code.
pub struct SuggestionIndex {
    key: PhoneticKey,
    groups: HashMap<String, Vec<String>>,
}

impl SuggestionIndex {
    /// Index every alias in the registry, preserving registration order
    /// within each group.
    pub fn from_registry(registry: &CommandRegistry, key: PhoneticKey) -> Self {
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for alias in registry.aliases() {
            if let Some(code) = key(&alias) {
                groups.entry(code).or_default().push(alias);
            }
        }
        Self { key, groups }
    }

    /// Aliases sharing the query's phonetic key, or empty when the key is
    /// unknown or the query has no key.
    pub fn suggest(&self, name: &str) -> Vec<String> {
        match (self.key)(name) {
            Some(code) => self.groups.get(&code).cloned().unwrap_or_default(),
            None => Vec::new(),
        }
    }
}
