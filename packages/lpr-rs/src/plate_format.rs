//! The plate template and the format check run on every OCR candidate.
//!
//! Plates have seven characters laid out letter, letter, digit, digit,
//! letter, letter, letter. OCR regularly confuses a handful of glyphs across
//! the two classes, so a character of the wrong class is still accepted when
//! the matching correction table knows how to turn it into the right one.

/// Misread letters found in digit slots, and the digit each one stands for.
pub const LETTER_TO_DIGIT: [(char, char); 6] = [
    ('O', '0'),
    ('I', '1'),
    ('J', '3'),
    ('A', '4'),
    ('G', '6'),
    ('S', '5'),
];

/// Misread digits found in letter slots, and the letter each one stands for.
/// Maintained separately from [`LETTER_TO_DIGIT`].
pub const DIGIT_TO_LETTER: [(char, char); 6] = [
    ('0', 'O'),
    ('1', 'I'),
    ('3', 'J'),
    ('4', 'A'),
    ('6', 'G'),
    ('5', 'S'),
];

pub const PLATE_LEN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Letter,
    Digit,
}

pub const TEMPLATE: [SlotKind; PLATE_LEN] = [
    SlotKind::Letter,
    SlotKind::Letter,
    SlotKind::Digit,
    SlotKind::Digit,
    SlotKind::Letter,
    SlotKind::Letter,
    SlotKind::Letter,
];

pub(crate) fn lookup(table: &[(char, char)], c: char) -> Option<char> {
    table.iter().find(|(from, _)| *from == c).map(|(_, to)| *to)
}

impl SlotKind {
    /// Already the right class for this slot.
    pub fn is_canonical(self, c: char) -> bool {
        match self {
            SlotKind::Letter => c.is_ascii_uppercase(),
            SlotKind::Digit => c.is_ascii_digit(),
        }
    }

    /// The table that rewrites characters into this slot's class.
    pub fn corrections(self) -> &'static [(char, char)] {
        match self {
            SlotKind::Letter => &DIGIT_TO_LETTER,
            SlotKind::Digit => &LETTER_TO_DIGIT,
        }
    }

    pub fn accepts(self, c: char) -> bool {
        self.is_canonical(c) || lookup(self.corrections(), c).is_some()
    }
}

/// Uppercases raw OCR text and drops spaces.
pub fn normalize(raw: &str) -> String {
    raw.to_uppercase().replace(' ', "")
}

/// Whether `text` fits the plate template, allowing known confusions.
///
/// `text` is expected to be normalized already; lowercase letters are not
/// accepted.
pub fn is_compliant(text: &str) -> bool {
    if text.chars().count() != PLATE_LEN {
        return false;
    }
    text.chars()
        .zip(TEMPLATE.iter())
        .all(|(c, slot)| slot.accepts(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_length_is_never_compliant() {
        for text in ["", "A", "AB12CD", "AB12CDEF", "AB12CDEFGHIJ"] {
            assert!(!is_compliant(text), "{text}");
        }
    }

    #[test]
    fn test_canonical_plate_is_compliant() {
        assert!(is_compliant("AB12CDE"));
        assert!(is_compliant("ZZ09XYZ"));
    }

    #[test]
    fn test_known_confusables_are_accepted() {
        // 4 in a letter slot, O and S in the digit slots
        assert!(is_compliant("4BOSCDE"));
        assert!(is_compliant("01AJ656"));
    }

    #[test]
    fn test_unknown_confusables_are_rejected() {
        // Z is not in the letter->digit table
        assert!(!is_compliant("4B1ZCDE"));
        // 2 is not in the digit->letter table
        assert!(!is_compliant("2B12CDE"));
        assert!(!is_compliant("AB12CD7"));
    }

    #[test]
    fn test_lowercase_and_symbols_are_rejected() {
        assert!(!is_compliant("ab12cde"));
        assert!(!is_compliant("AB-2CDE"));
        assert!(!is_compliant("AB12CD "));
    }

    #[test]
    fn test_multibyte_text_counts_characters() {
        assert!(!is_compliant("ÄB12CDE"));
        assert!(!is_compliant("AB12CDÉ"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("ab12 cde"), "AB12CDE");
        assert_eq!(normalize(" A B 1 2 C D E "), "AB12CDE");
    }

    #[test]
    fn test_tables_map_across_classes() {
        for (letter, digit) in LETTER_TO_DIGIT {
            assert!(letter.is_ascii_uppercase());
            assert!(digit.is_ascii_digit());
        }
        for (digit, letter) in DIGIT_TO_LETTER {
            assert!(digit.is_ascii_digit());
            assert!(letter.is_ascii_uppercase());
        }
    }
}
