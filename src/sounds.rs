//! Built-in hub sounds.
//!
//! The speaker plays a sound by index. A handful of indices have names; any
//! other index can still be played by number.

/// Immutable name → index table for the speaker.
#[derive(Clone, Copy, Debug)]
pub struct SoundTable {
    entries: &'static [(&'static str, u8)],
}

/// Named sounds of the DUPLO hub.
pub const STANDARD_SOUNDS: [(&str, u8); 5] = [
    ("brake", 3),
    ("depart", 5),
    ("water", 7),
    ("horn", 9),
    ("steam", 10),
];

impl SoundTable {
    /// Table over [`STANDARD_SOUNDS`].
    pub fn standard() -> Self {
        Self {
            entries: &STANDARD_SOUNDS,
        }
    }

    /// Index for a sound name, case-insensitive.
    pub fn lookup(&self, name: &str) -> Option<u8> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, index)| *index)
    }

    /// Resolve a name, falling back to a plain numeric index.
    ///
    /// ```
    /// use duplo_hub::sounds::SoundTable;
    ///
    /// let sounds = SoundTable::standard();
    /// assert_eq!(sounds.resolve("Horn"), Some(9));
    /// assert_eq!(sounds.resolve("4"), Some(4));
    /// assert_eq!(sounds.resolve("moo"), None);
    /// ```
    pub fn resolve(&self, name_or_index: &str) -> Option<u8> {
        self.lookup(name_or_index)
            .or_else(|| name_or_index.trim().parse::<u8>().ok())
    }

    /// Name for an index, if it has one.
    pub fn name_of(&self, index: u8) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, i)| *i == index)
            .map(|(name, _)| *name)
    }

    /// All named sounds.
    pub fn entries(&self) -> &'static [(&'static str, u8)] {
        self.entries
    }
}

impl Default for SoundTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve() {
        let sounds = SoundTable::standard();
        assert_eq!(sounds.resolve("brake"), Some(3));
        assert_eq!(sounds.resolve("depart"), Some(5));
        assert_eq!(sounds.resolve("water"), Some(7));
        assert_eq!(sounds.resolve("horn"), Some(9));
        assert_eq!(sounds.resolve("steam"), Some(10));
    }

    #[test]
    fn names_are_case_insensitive() {
        let sounds = SoundTable::standard();
        assert_eq!(sounds.resolve("STEAM"), Some(10));
        assert_eq!(sounds.resolve(" Horn "), Some(9));
    }

    #[test]
    fn numeric_fallback() {
        let sounds = SoundTable::standard();
        assert_eq!(sounds.resolve("0"), Some(0));
        assert_eq!(sounds.resolve("9"), Some(9));
        assert_eq!(sounds.resolve("255"), Some(255));
    }

    #[test]
    fn unresolvable() {
        let sounds = SoundTable::standard();
        assert_eq!(sounds.resolve(""), None);
        assert_eq!(sounds.resolve("whistle"), None);
        assert_eq!(sounds.resolve("256"), None);
        assert_eq!(sounds.resolve("-1"), None);
        assert_eq!(sounds.resolve("3.5"), None);
    }

    #[test]
    fn reverse_lookup() {
        let sounds = SoundTable::standard();
        assert_eq!(sounds.name_of(7), Some("water"));
        assert_eq!(sounds.name_of(4), None);
    }
}
