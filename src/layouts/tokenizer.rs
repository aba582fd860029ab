//! # String Tokenizer
//!
//! Maps the sparse path names a layout declares to small integer tokens, so
//! that a declared path costs a single varint byte in every row instead of its
//! UTF-8 text. Tokens are dense and assigned in insertion order starting at 0.
//!
//! ## Path Encoding
//!
//! A sparse path is written as one varuint `v`:
//!
//! ```text
//! v <  count   token v
//! v >= count   inline UTF-8 path of (v - count) bytes follows
//! ```
//!
//! so the empty inline path (used for staged values) is `v == count`.

use hashbrown::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringTokenizer {
    tokens: HashMap<String, u64>,
    strings: Vec<String>,
}

impl StringTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the token for `path`, assigning the next one if it is new.
    pub fn add(&mut self, path: &str) -> u64 {
        if let Some(&token) = self.tokens.get(path) {
            return token;
        }
        let token = self.strings.len() as u64;
        self.strings.push(path.to_string());
        self.tokens.insert(path.to_string(), token);
        token
    }

    pub fn token(&self, path: &str) -> Option<u64> {
        self.tokens.get(path).copied()
    }

    pub fn string(&self, token: u64) -> Option<&str> {
        self.strings.get(token as usize).map(String::as_str)
    }

    pub fn count(&self) -> u64 {
        self.strings.len() as u64
    }
}
