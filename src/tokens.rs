//! Token buffer holding the command-line tokens of one parse.
//!
//! The token list itself never changes. Elements claim tokens by slot
//! index; claimed tokens disappear from every view of the buffer. The
//! parser hands the buffer to one element at a time as `&mut TokenBuffer`,
//! so claims are strictly sequential.

/// Whether a token starts with a dash.
///
/// Positional scanning never claims option-like tokens.
pub fn is_option_like(token: &str) -> bool {
    token.starts_with('-')
}

/// Ordered tokens plus a claim mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBuffer {
    tokens: Vec<String>,
    claimed: Vec<bool>,
}

impl TokenBuffer {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let claimed = vec![false; tokens.len()];
        Self { tokens, claimed }
    }

    /// Number of unclaimed tokens.
    pub fn len(&self) -> usize {
        self.claimed.iter().filter(|c| !**c).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unclaimed token at `slot`.
    pub fn get(&self, slot: usize) -> Option<&str> {
        match self.claimed.get(slot) {
            Some(false) => self.tokens.get(slot).map(String::as_str),
            _ => None,
        }
    }

    /// Unclaimed tokens with their slots, left to right.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(slot, _)| !self.claimed[*slot])
            .map(|(slot, token)| (slot, token.as_str()))
    }

    /// Slots of unclaimed, non-option-like tokens, left to right.
    pub fn candidates(&self) -> Vec<usize> {
        self.slots()
            .filter(|(_, token)| !is_option_like(token))
            .map(|(slot, _)| slot)
            .collect()
    }

    /// First unclaimed token after `slot`.
    pub fn next_after(&self, slot: usize) -> Option<(usize, &str)> {
        self.slots().find(|(s, _)| *s > slot)
    }

    /// Claim the token at `slot`. `None` if it is out of range or already claimed.
    pub fn take(&mut self, slot: usize) -> Option<String> {
        let token = self.get(slot)?.to_string();
        self.claimed[slot] = true;
        tracing::trace!("Claimed token #{} '{}'", slot, token);
        Some(token)
    }

    /// Claim several slots, skipping any that are unavailable.
    pub fn take_all(&mut self, slots: &[usize]) -> Vec<String> {
        slots.iter().filter_map(|slot| self.take(*slot)).collect()
    }

    /// Unclaimed tokens in order.
    pub fn remaining(&self) -> Vec<&str> {
        self.slots().map(|(_, token)| token).collect()
    }

    pub fn into_remaining(self) -> Vec<String> {
        self.tokens
            .into_iter()
            .zip(self.claimed)
            .filter(|(_, claimed)| !claimed)
            .map(|(token, _)| token)
            .collect()
    }
}
