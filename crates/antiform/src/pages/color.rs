//! Color picker page: match a random color by name, judged by hex distance.

use std::fmt;
use std::sync::LazyLock;

use rand::{Rng, RngCore};
use regex::Regex;

use super::{PageId, PageInput, PageRules, Verdict};
use crate::unlock::{Counter, Progress};

static HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#[0-9A-F]{6}$").expect("valid hex pattern"));

/// Named colors, searched in order. Later duplicates of a value were folded in.
const NAMES: &[(&str, &str)] = &[
    ("#FF0000", "Red"),
    ("#00FF00", "Lime"),
    ("#0000FF", "Blue"),
    ("#FFFF00", "Yellow"),
    ("#00FFFF", "Cyan"),
    ("#FF00FF", "Fuchsia"),
    ("#C0C0C0", "Silver"),
    ("#808080", "Gray"),
    ("#800000", "Maroon"),
    ("#808000", "Olive"),
    ("#008000", "Green"),
    ("#800080", "Purple"),
    ("#008080", "Teal"),
    ("#000080", "Navy"),
    ("#FFA500", "Orange"),
    ("#FFC0CB", "Pink"),
    ("#A52A2A", "Brown"),
    ("#FFD700", "Gold"),
    ("#4B0082", "Indigo"),
    ("#EE82EE", "Violet"),
    ("#F0E68C", "Khaki"),
    ("#E6E6FA", "Lavender"),
    ("#FFDAB9", "Peach Puff"),
    ("#CD5C5C", "Indian Red"),
    ("#F08080", "Light Coral"),
    ("#FA8072", "Salmon"),
    ("#E9967A", "Dark Salmon"),
    ("#FFA07A", "Light Salmon"),
    ("#DC143C", "Crimson"),
    ("#FF1493", "Deep Pink"),
    ("#FF69B4", "Hot Pink"),
    ("#FFB6C1", "Light Pink"),
    ("#FF6347", "Tomato"),
    ("#FF4500", "Orange Red"),
    ("#FF8C00", "Dark Orange"),
    ("#FFFFE0", "Light Yellow"),
    ("#FFFACD", "Lemon Chiffon"),
    ("#FAFAD2", "Light Goldenrod Yellow"),
    ("#FFEFD5", "Papaya Whip"),
    ("#FFE4B5", "Moccasin"),
    ("#EEE8AA", "Pale Goldenrod"),
    ("#BDB76B", "Dark Khaki"),
    ("#D8BFD8", "Thistle"),
    ("#DDA0DD", "Plum"),
    ("#DA70D6", "Orchid"),
    ("#BA55D3", "Medium Orchid"),
    ("#9370DB", "Medium Purple"),
    ("#8A2BE2", "Blue Violet"),
    ("#9400D3", "Dark Violet"),
    ("#9932CC", "Dark Orchid"),
    ("#8B008B", "Dark Magenta"),
    ("#6A5ACD", "Slate Blue"),
    ("#483D8B", "Dark Slate Blue"),
    ("#7B68EE", "Medium Slate Blue"),
    ("#ADFF2F", "Green Yellow"),
    ("#7FFF00", "Chartreuse"),
    ("#7CFC00", "Lawn Green"),
    ("#32CD32", "Lime Green"),
    ("#98FB98", "Pale Green"),
    ("#90EE90", "Light Green"),
    ("#00FA9A", "Medium Spring Green"),
    ("#00FF7F", "Spring Green"),
    ("#3CB371", "Medium Sea Green"),
    ("#2E8B57", "Sea Green"),
    ("#228B22", "Forest Green"),
    ("#006400", "Dark Green"),
    ("#9ACD32", "Yellow Green"),
    ("#6B8E23", "Olive Drab"),
    ("#556B2F", "Dark Olive Green"),
    ("#66CDAA", "Medium Aquamarine"),
    ("#8FBC8F", "Dark Sea Green"),
    ("#20B2AA", "Light Sea Green"),
    ("#008B8B", "Dark Cyan"),
    ("#00CED1", "Dark Turquoise"),
    ("#40E0D0", "Turquoise"),
    ("#48D1CC", "Medium Turquoise"),
    ("#AFEEEE", "Pale Turquoise"),
    ("#E0FFFF", "Light Cyan"),
    ("#5F9EA0", "Cadet Blue"),
    ("#4682B4", "Steel Blue"),
    ("#B0C4DE", "Light Steel Blue"),
    ("#B0E0E6", "Powder Blue"),
    ("#ADD8E6", "Light Blue"),
    ("#87CEEB", "Sky Blue"),
    ("#87CEFA", "Light Sky Blue"),
    ("#00BFFF", "Deep Sky Blue"),
    ("#1E90FF", "Dodger Blue"),
    ("#6495ED", "Cornflower Blue"),
    ("#4169E1", "Royal Blue"),
    ("#0000CD", "Medium Blue"),
    ("#00008B", "Dark Blue"),
    ("#191970", "Midnight Blue"),
    ("#FFF8DC", "Cornsilk"),
    ("#FFEBCD", "Blanched Almond"),
    ("#FFE4C4", "Bisque"),
    ("#FFDEAD", "Navajo White"),
    ("#F5DEB3", "Wheat"),
    ("#DEB887", "Burlywood"),
    ("#D2B48C", "Tan"),
    ("#BC8F8F", "Rosy Brown"),
    ("#F4A460", "Sandy Brown"),
    ("#DAA520", "Goldenrod"),
    ("#B8860B", "Dark Goldenrod"),
    ("#CD853F", "Peru"),
    ("#D2691E", "Chocolate"),
    ("#8B4513", "Saddle Brown"),
    ("#A0522D", "Sienna"),
    ("#FFFFFF", "White"),
    ("#FFFAFA", "Snow"),
    ("#F0FFF0", "Honeydew"),
    ("#F5FFFA", "Mint Cream"),
    ("#F0FFFF", "Azure"),
    ("#F0F8FF", "Alice Blue"),
    ("#F8F8FF", "Ghost White"),
    ("#F5F5F5", "White Smoke"),
    ("#FFF5EE", "Seashell"),
    ("#F5F5DC", "Beige"),
    ("#FDF5E6", "Old Lace"),
    ("#FFFAF0", "Floral White"),
    ("#FFFFF0", "Ivory"),
    ("#FAEBD7", "Antique White"),
    ("#FAF0E6", "Linen"),
    ("#FFF0F5", "Lavender Blush"),
    ("#FFE4E1", "Misty Rose"),
    ("#DCDCDC", "Gainsboro"),
    ("#D3D3D3", "Light Gray"),
    ("#A9A9A9", "Dark Gray"),
    ("#696969", "Dim Gray"),
    ("#778899", "Light Slate Gray"),
    ("#708090", "Slate Gray"),
    ("#2F4F4F", "Dark Slate Gray"),
    ("#000000", "Black"),
];

/// Logged when an attempt falls inside the tolerance.
pub const CLOSE_ENOUGH: &str = "Color is close enough!";

/// Logged when the input is not `#RRGGBB`.
pub const INVALID_FORMAT: &str =
    "Invalid color format. Please enter a valid hex color (e.g., #FF0000).";

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Parse `#RRGGBB`, case-insensitive.
    #[must_use]
    pub fn parse(hex: &str) -> Option<Self> {
        if !HEX.is_match(hex) {
            return None;
        }
        let value = u32::from_str_radix(&hex[1..], 16).ok()?;
        let [_, r, g, b] = value.to_be_bytes();
        Some(Self { r, g, b })
    }

    /// Straight-line distance in RGB space.
    #[must_use]
    pub fn distance(self, other: Rgb) -> f64 {
        let d = |a: u8, b: u8| (f64::from(a) - f64::from(b)).powi(2);
        (d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)).sqrt()
    }

    /// Exact name if the color is in the table, otherwise the nearest one.
    #[must_use]
    pub fn name(self) -> &'static str {
        let mut best = ("Unknown Color", f64::INFINITY);
        for (hex, name) in NAMES {
            let Some(known) = Rgb::parse(hex) else {
                continue;
            };
            let distance = self.distance(known);
            if distance == 0.0 {
                return name;
            }
            if distance < best.1 {
                best = (name, distance);
            }
        }
        best.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Rules for the color picker page.
#[derive(Debug, Clone)]
pub struct ColorRules {
    target: Rgb,
    tolerance: f64,
}

impl ColorRules {
    /// Create the page rules with a random target.
    pub fn new(rng: &mut dyn RngCore, tolerance: f64) -> Self {
        let [_, r, g, b] = rng.random_range(0..0x00FF_FFFF_u32).to_be_bytes();
        Self::with_target(Rgb { r, g, b }, tolerance)
    }

    /// Create the page rules with a fixed target.
    #[must_use]
    pub fn with_target(target: Rgb, tolerance: f64) -> Self {
        Self { target, tolerance }
    }

    /// The color the player is asked for.
    #[must_use]
    pub fn target(&self) -> Rgb {
        self.target
    }
}

impl PageRules for ColorRules {
    fn id(&self) -> PageId {
        PageId::ColorPicker
    }

    fn counter(&self) -> Counter {
        Counter::Attempts
    }

    fn parse(&self, raw: &str) -> PageInput {
        PageInput::Color(raw.trim().to_uppercase())
    }

    fn judge(&mut self, input: &PageInput, _rng: &mut dyn RngCore) -> Verdict {
        let PageInput::Color(raw) = input else {
            return Verdict::Ignored { note: None };
        };
        let Some(picked) = Rgb::parse(raw) else {
            return Verdict::mistake(INVALID_FORMAT);
        };

        if picked.distance(self.target) <= self.tolerance {
            Verdict::Accepted {
                message: CLOSE_ENOUGH.to_string(),
                logged: true,
            }
        } else {
            Verdict::mistake(format!(
                "Wrong color. You picked {} ({picked}).",
                picked.name()
            ))
        }
    }

    fn live_note(&self, input: &PageInput, _rng: &mut dyn RngCore) -> Option<String> {
        let PageInput::Color(raw) = input else {
            return None;
        };
        let picked = Rgb::parse(raw)?;
        let distance = picked.distance(self.target);
        let warmth = if distance == 0.0 {
            "perfect match"
        } else if distance < 30.0 {
            "very close"
        } else if distance < 80.0 {
            "getting warmer"
        } else {
            "cold"
        };
        Some(format!(
            "Your Selection: {} ({picked}) [{warmth}]",
            picked.name()
        ))
    }

    fn unlock_banner(&self) -> &'static str {
        "Are you color blind?"
    }

    fn hint(&self, progress: &Progress) -> String {
        format!("TARGET: {} ATTEMPTS: {}", self.target, progress.mistakes)
    }

    fn prompt(&self) -> Vec<String> {
        vec![
            format!("Pick this color: {}", self.target.name()),
            "Enter a hex color like #FF0000.".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TARGET: Rgb = Rgb {
        r: 0x34,
        g: 0x98,
        b: 0xDB,
    };

    fn judge(raw: &str) -> Verdict {
        let mut rules = ColorRules::with_target(TARGET, 15.0);
        let mut rng = StdRng::seed_from_u64(0);
        let input = rules.parse(raw);
        rules.judge(&input, &mut rng)
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse("#3498db"), Some(TARGET));
        assert_eq!(Rgb::parse("#3498DB"), Some(TARGET));
        assert_eq!(Rgb::parse("3498DB"), None);
        assert_eq!(Rgb::parse("#3498D"), None);
        assert_eq!(Rgb::parse("#GGGGGG"), None);
        assert_eq!(TARGET.to_string(), "#3498DB");
    }

    #[test]
    fn test_names() {
        assert_eq!(Rgb::parse("#FF00FF").unwrap().name(), "Fuchsia");
        assert_eq!(Rgb::parse("#00FFFF").unwrap().name(), "Cyan");
        assert_eq!(Rgb::parse("#FE0101").unwrap().name(), "Red");
        assert_eq!(Rgb::parse("#000001").unwrap().name(), "Black");
    }

    #[test]
    fn test_table_is_unique_and_valid() {
        let mut seen = std::collections::HashSet::new();
        for (hex, _) in NAMES {
            assert!(Rgb::parse(hex).is_some(), "{hex}");
            assert!(seen.insert(*hex), "duplicate {hex}");
        }
    }

    #[test]
    fn test_close_enough_is_logged_success() {
        assert_eq!(
            judge("#3498DA"),
            Verdict::Accepted {
                message: CLOSE_ENOUGH.to_string(),
                logged: true,
            }
        );
    }

    #[test]
    fn test_wrong_color() {
        assert_eq!(
            judge("#ff0000"),
            Verdict::mistake("Wrong color. You picked Red (#FF0000).")
        );
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(judge("blue"), Verdict::mistake(INVALID_FORMAT));
        assert_eq!(judge(""), Verdict::mistake(INVALID_FORMAT));
    }

    #[test]
    fn test_random_target_is_seeded() {
        let a = ColorRules::new(&mut StdRng::seed_from_u64(8), 15.0);
        let b = ColorRules::new(&mut StdRng::seed_from_u64(8), 15.0);
        assert_eq!(a.target(), b.target());
    }

    #[test]
    fn test_live_note_warmth() {
        let rules = ColorRules::with_target(TARGET, 15.0);
        let mut rng = StdRng::seed_from_u64(0);
        let note = rules.live_note(&rules.parse("#3498DB"), &mut rng).unwrap();
        assert!(note.ends_with("(#3498DB) [perfect match]"));
        assert!(rules.live_note(&rules.parse("nope"), &mut rng).is_none());
    }

    #[test]
    fn test_hint_shows_target() {
        let rules = ColorRules::with_target(TARGET, 15.0);
        let progress = crate::unlock::UnlockMachine::new(5, Counter::Attempts).progress();
        assert_eq!(rules.hint(&progress), "TARGET: #3498DB ATTEMPTS: 0");
    }
}
