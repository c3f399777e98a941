//! Flag sets carried by style attributes
//!
//! Text effects are stored as a value/mask pair so that "effect explicitly
//! off" and "effect not authored" stay distinct. Bullet styles describe how a
//! list paragraph's bullet is rendered and numbered.

use core::fmt::Write as _;

bitflags::bitflags! {
    /// Character-level text effects
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TextEffects: u16 {
        /// Line through the middle of the text
        const STRIKETHROUGH = 1 << 0;
        /// Render as capitals
        const CAPITALS = 1 << 1;
        /// Render lowercase as reduced capitals
        const SMALL_CAPITALS = 1 << 2;
        /// Raised, reduced text
        const SUPERSCRIPT = 1 << 3;
        /// Lowered, reduced text
        const SUBSCRIPT = 1 << 4;
        /// Drop shadow
        const SHADOW = 1 << 5;
        /// Outlined glyphs
        const OUTLINE = 1 << 6;
        /// Raised relief
        const EMBOSS = 1 << 7;
        /// Sunken relief
        const ENGRAVE = 1 << 8;
    }
}

bitflags::bitflags! {
    /// How a list paragraph's bullet is drawn
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BulletStyle: u32 {
        /// 1, 2, 3
        const ARABIC = 1 << 0;
        /// A, B, C
        const LETTERS_UPPER = 1 << 1;
        /// a, b, c
        const LETTERS_LOWER = 1 << 2;
        /// I, II, III
        const ROMAN_UPPER = 1 << 3;
        /// i, ii, iii
        const ROMAN_LOWER = 1 << 4;
        /// A literal symbol taken from the bullet text
        const SYMBOL = 1 << 5;
        /// An image bullet named by the bullet name
        const BITMAP = 1 << 6;
        /// Wrap the number in parentheses
        const PARENTHESES = 1 << 7;
        /// Follow the number with a period
        const PERIOD = 1 << 8;
        /// A named standard bullet shape
        const STANDARD = 1 << 9;
        /// Follow the number with a closing parenthesis
        const RIGHT_PARENTHESIS = 1 << 10;
        /// Prefix with the numbers of all enclosing levels
        const OUTLINE = 1 << 11;
        /// Bullet aligned to the right of its area
        const ALIGN_RIGHT = 1 << 12;
        /// Bullet centred in its area
        const ALIGN_CENTRE = 1 << 13;
        /// Paragraph continues the previous item without its own bullet
        const CONTINUATION = 1 << 14;

        /// Every numbering scheme
        const NUMBERED = Self::ARABIC.bits()
            | Self::LETTERS_UPPER.bits()
            | Self::LETTERS_LOWER.bits()
            | Self::ROMAN_UPPER.bits()
            | Self::ROMAN_LOWER.bits();
    }
}

impl BulletStyle {
    /// Check whether the bullet carries a number
    #[must_use]
    pub const fn is_numbered(self) -> bool {
        self.intersects(Self::NUMBERED)
    }

    /// Check whether any bullet is drawn at all
    #[must_use]
    pub const fn has_bullet(self) -> bool {
        self.intersects(Self::NUMBERED)
            || self.intersects(Self::SYMBOL)
            || self.intersects(Self::BITMAP)
            || self.intersects(Self::STANDARD)
    }

    /// Render `number` with this style's numbering scheme and punctuation
    ///
    /// Returns `None` for unnumbered bullets.
    #[must_use]
    pub fn format_number(self, number: u32) -> Option<String> {
        let body = if self.contains(Self::ARABIC) {
            number.to_string()
        } else if self.contains(Self::LETTERS_UPPER) {
            alphabetic(number, b'A')
        } else if self.contains(Self::LETTERS_LOWER) {
            alphabetic(number, b'a')
        } else if self.contains(Self::ROMAN_UPPER) {
            roman(number)
        } else if self.contains(Self::ROMAN_LOWER) {
            roman(number).to_lowercase()
        } else {
            return None;
        };

        let mut out = String::with_capacity(body.len() + 2);
        if self.contains(Self::PARENTHESES) {
            let _ = write!(out, "({body})");
        } else if self.contains(Self::RIGHT_PARENTHESIS) {
            let _ = write!(out, "{body})");
        } else if self.contains(Self::PERIOD) {
            let _ = write!(out, "{body}.");
        } else {
            out.push_str(&body);
        }
        Some(out)
    }
}

/// 1 -> a, 26 -> z, 27 -> aa
fn alphabetic(number: u32, base: u8) -> String {
    let mut n = number.max(1);
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(base + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

fn roman(number: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut n = number.max(1);
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}
