//! Class list
//!
//! The parsed form of an element's `class` attribute. Tokens keep their
//! first-seen order so the serialized attribute stays stable.

/// Ordered set of class tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `class` attribute value; repeated tokens collapse
    pub fn parse(value: &str) -> Self {
        let mut list = Self::new();
        for token in value.split_ascii_whitespace() {
            list.add(token);
        }
        list
    }

    /// A token is non-empty and contains no ASCII whitespace
    pub fn is_valid_token(token: &str) -> bool {
        !token.is_empty() && !token.bytes().any(|b| b.is_ascii_whitespace())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token. Invalid or already present tokens are ignored.
    pub fn add(&mut self, token: &str) -> bool {
        if !Self::is_valid_token(token) || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    pub fn remove(&mut self, token: &str) -> bool {
        match self.tokens.iter().position(|t| t == token) {
            Some(index) => {
                self.tokens.remove(index);
                true
            }
            None => false,
        }
    }

    /// Serialized attribute value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}
