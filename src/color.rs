//! Light palette and color-sensor classification.
//!
//! The hub's front light takes a LEGO color number ([`LightColor`]). The color
//! sensor reports three small channel values which [`ColorTable::classify`]
//! matches exactly against the known track-tile colors.
//!
//! ```rust
//! use duplo_hub::color::{ColorTable, LightColor};
//!
//! let table = ColorTable::standard();
//! let white = table.classify(6, 5, 5).unwrap();
//! assert_eq!(white.name, "white");
//! assert_eq!(white.display_color, Some(LightColor::White));
//!
//! // Unseen readings are normal, not errors.
//! assert!(table.classify(1, 1, 1).is_none());
//! ```

use crate::codec::RgbSample;

/// Colors the hub light can show, valued as LEGO color numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LightColor {
    /// Light off.
    None = 0,
    /// Pinkish red.
    LightRed = 1,
    /// Magenta.
    Magenta = 2,
    /// Blue.
    Blue = 3,
    /// Light blue.
    LightBlue = 4,
    /// Cyan.
    Cyan = 5,
    /// Green.
    Green = 6,
    /// Yellow.
    Yellow = 7,
    /// Orange.
    Orange = 8,
    /// Red.
    Red = 9,
    /// White.
    White = 10,
}

impl LightColor {
    /// Every palette entry, in color-number order.
    pub const ALL: [LightColor; 11] = [
        LightColor::None,
        LightColor::LightRed,
        LightColor::Magenta,
        LightColor::Blue,
        LightColor::LightBlue,
        LightColor::Cyan,
        LightColor::Green,
        LightColor::Yellow,
        LightColor::Orange,
        LightColor::Red,
        LightColor::White,
    ];

    /// LEGO color number written to the light port.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LightColor::None => "none",
            LightColor::LightRed => "lightred",
            LightColor::Magenta => "magenta",
            LightColor::Blue => "blue",
            LightColor::LightBlue => "lightblue",
            LightColor::Cyan => "cyan",
            LightColor::Green => "green",
            LightColor::Yellow => "yellow",
            LightColor::Orange => "orange",
            LightColor::Red => "red",
            LightColor::White => "white",
        }
    }

    /// Parse a color name.
    ///
    /// Trimmed and case-insensitive; `"off"` is accepted for [`LightColor::None`]
    /// and `_`/`-` separators are ignored.
    ///
    /// ```
    /// use duplo_hub::color::LightColor;
    ///
    /// assert_eq!(LightColor::from_text("Red"), Some(LightColor::Red));
    /// assert_eq!(LightColor::from_text("light_blue"), Some(LightColor::LightBlue));
    /// assert_eq!(LightColor::from_text("off"), Some(LightColor::None));
    /// assert_eq!(LightColor::from_text("chartreuse"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        let mut buf: heapless::String<16> = heapless::String::new();
        for c in s.trim().chars().filter(|c| *c != '_' && *c != '-') {
            buf.push(c.to_ascii_lowercase()).ok()?;
        }
        if buf.as_str() == "off" {
            return Some(LightColor::None);
        }
        Self::ALL.into_iter().find(|c| c.as_str() == buf.as_str())
    }

    /// Palette entry for a LEGO color number.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

/// One known sensor color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColorEntry {
    /// Color name.
    pub name: &'static str,
    /// Expected `[r, g, b]` sensor reading.
    pub rgb: [u8; 3],
    /// Light color to show when this color is seen, if any.
    pub display_color: Option<LightColor>,
}

impl ColorEntry {
    /// Create an entry.
    pub const fn new(name: &'static str, rgb: [u8; 3], display_color: Option<LightColor>) -> Self {
        Self {
            name,
            rgb,
            display_color,
        }
    }
}

/// Track-tile colors the sensor is known to report.
pub const STANDARD_COLORS: [ColorEntry; 12] = [
    ColorEntry::new("white", [6, 5, 5], Some(LightColor::White)),
    ColorEntry::new("brightblue", [0, 1, 3], Some(LightColor::Blue)),
    ColorEntry::new("treegreen", [2, 2, 0], Some(LightColor::Green)),
    ColorEntry::new("housesalmon", [5, 5, 6], Some(LightColor::LightRed)),
    ColorEntry::new("starpurple", [3, 2, 3], Some(LightColor::LightBlue)),
    ColorEntry::new("clockorange", [6, 0, 0], Some(LightColor::Orange)),
    ColorEntry::new("brightred", [4, 0, 0], Some(LightColor::Red)),
    ColorEntry::new("darkgreen", [0, 2, 0], Some(LightColor::Green)),
    ColorEntry::new("wrenchyellow", [6, 2, 0], Some(LightColor::Yellow)),
    ColorEntry::new("brightyellow", [6, 3, 0], Some(LightColor::Yellow)),
    ColorEntry::new("electricgreen", [0, 3, 1], Some(LightColor::Green)),
    ColorEntry::new("newwaterblue", [0, 2, 4], Some(LightColor::Blue)),
];

/// Immutable lookup table of sensor colors.
#[derive(Clone, Copy, Debug)]
pub struct ColorTable {
    entries: &'static [ColorEntry],
}

impl ColorTable {
    /// Table over [`STANDARD_COLORS`].
    pub fn standard() -> Self {
        Self {
            entries: &STANDARD_COLORS,
        }
    }

    /// Table over caller-provided entries.
    pub const fn from_entries(entries: &'static [ColorEntry]) -> Self {
        Self { entries }
    }

    /// Exact-match classification. First matching entry wins.
    pub fn classify(&self, red: u8, green: u8, blue: u8) -> Option<&'static ColorEntry> {
        let rgb = [red, green, blue];
        self.entries.iter().find(|e| e.rgb == rgb)
    }

    /// [`classify`](Self::classify) for a decoded sample.
    pub fn classify_sample(&self, sample: RgbSample) -> Option<&'static ColorEntry> {
        self.classify(sample.red, sample.green, sample.blue)
    }

    /// Look an entry up by name.
    pub fn get(&self, name: &str) -> Option<&'static ColorEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// All entries.
    pub fn entries(&self) -> &'static [ColorEntry] {
        self.entries
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_tiles() {
        let table = ColorTable::standard();
        assert_eq!(table.classify(6, 5, 5).map(|e| e.name), Some("white"));
        assert_eq!(table.classify(0, 1, 3).map(|e| e.name), Some("brightblue"));
        assert_eq!(table.classify(6, 3, 0).map(|e| e.name), Some("brightyellow"));
        assert_eq!(table.classify(0, 2, 4).map(|e| e.name), Some("newwaterblue"));
    }

    #[test]
    fn classify_is_exact() {
        let table = ColorTable::standard();
        assert!(table.classify(1, 1, 1).is_none());
        // One channel off from white
        assert!(table.classify(6, 5, 4).is_none());
        assert!(table.classify(0, 0, 0).is_none());
    }

    #[test]
    fn standard_rgb_triples_are_unique() {
        for (i, a) in STANDARD_COLORS.iter().enumerate() {
            for b in &STANDARD_COLORS[i + 1..] {
                assert_ne!(a.rgb, b.rgb, "{} and {} collide", a.name, b.name);
            }
        }
    }

    #[test]
    fn every_standard_entry_classifies_to_itself() {
        let table = ColorTable::standard();
        for entry in table.entries() {
            let [r, g, b] = entry.rgb;
            assert_eq!(table.classify(r, g, b), Some(entry));
        }
    }

    #[test]
    fn custom_table() {
        static ENTRIES: [ColorEntry; 1] = [ColorEntry::new("grey", [1, 1, 1], None)];
        let table = ColorTable::from_entries(&ENTRIES);
        let grey = table.classify(1, 1, 1).unwrap();
        assert_eq!(grey.name, "grey");
        assert!(grey.display_color.is_none());
        assert!(table.classify(6, 5, 5).is_none());
    }

    #[test]
    fn classify_sample_matches_classify() {
        let table = ColorTable::standard();
        let entry = table.classify_sample(RgbSample::new(4, 0, 0)).unwrap();
        assert_eq!(entry.name, "brightred");
        assert_eq!(entry.display_color, Some(LightColor::Red));
    }

    #[test]
    fn lookup_by_name() {
        let table = ColorTable::standard();
        assert_eq!(table.get("TreeGreen").map(|e| e.rgb), Some([2, 2, 0]));
        assert!(table.get("mauve").is_none());
    }

    #[test]
    fn light_color_codes() {
        assert_eq!(LightColor::None.code(), 0);
        assert_eq!(LightColor::LightRed.code(), 1);
        assert_eq!(LightColor::Red.code(), 9);
        assert_eq!(LightColor::White.code(), 10);
        for color in LightColor::ALL {
            assert_eq!(LightColor::from_code(color.code()), Some(color));
        }
        assert_eq!(LightColor::from_code(11), None);
    }

    #[test]
    fn light_color_from_text_variants() {
        assert_eq!(LightColor::from_text("  WHITE "), Some(LightColor::White));
        assert_eq!(LightColor::from_text("light-red"), Some(LightColor::LightRed));
        assert_eq!(LightColor::from_text("none"), Some(LightColor::None));
        assert_eq!(LightColor::from_text(""), None);
        assert_eq!(LightColor::from_text("a-very-long-color-name"), None);
    }
}
