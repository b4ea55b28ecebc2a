//! Prefixed, zero-padded record identifiers such as `AP000011`.
//!
//! The next identifier is always derived from the highest one already
//! stored. Deriving it is a read followed by a separate insert, so two
//! concurrent writers can compute the same value; the table's primary key is
//! what finally rejects the duplicate.

/// An identifier namespace: a fixed alphabetic prefix and a zero-padded
/// numeric suffix of at least `width` digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialId {
    prefix: &'static str,
    width: usize,
}

impl SequentialId {
    pub const fn new(prefix: &'static str, width: usize) -> Self {
        Self { prefix, width }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// The first identifier of the namespace, e.g. `PR000001`.
    pub fn first(&self) -> String {
        self.format(1)
    }

    pub fn format(&self, value: u64) -> String {
        format!("{}{:0width$}", self.prefix, value, width = self.width)
    }

    /// Numeric suffix of `id`, if it carries this namespace's prefix
    /// followed by digits only.
    pub fn parse(&self, id: &str) -> Option<u64> {
        let suffix = id.strip_prefix(self.prefix)?;
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        suffix.parse().ok()
    }

    /// Next identifier after the largest parsable one in `ids`. Suffixes are
    /// compared as numbers, so ids wider than `width` still sort last. No
    /// parsable id restarts the sequence at 1.
    pub fn next_from_max<'a, I>(&self, ids: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        match ids.into_iter().filter_map(|id| self.parse(id)).max() {
            Some(value) => self.format(value.saturating_add(1)),
            None => self.first(),
        }
    }
}
