/// Read-only view over the characters of one physical line.
///
/// Lookups past either end return `None` instead of a sentinel character, so
/// a pattern can never match against padding.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineCursor<'a> {
    chars: &'a [char],
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(chars: &'a [char]) -> Self {
        Self { chars }
    }

    #[inline]
    pub(crate) fn at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    /// The character immediately before `idx`.
    #[inline]
    pub(crate) fn prev(&self, idx: usize) -> Option<char> {
        idx.checked_sub(1).and_then(|i| self.at(i))
    }

    pub(crate) fn starts_with(&self, idx: usize, pat: &str) -> bool {
        let mut i = idx;
        for expected in pat.chars() {
            if self.at(i) != Some(expected) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Everything from `idx` to the end of the line.
    pub(crate) fn rest(&self, idx: usize) -> String {
        self.chars
            .get(idx..)
            .map_or_else(String::new, |tail| tail.iter().collect())
    }
}
