//! Position-aware rewrite of confusable characters.
use crate::plate_format::{is_compliant, lookup, TEMPLATE};

/// Rewrites each character into the class its slot expects, using the
/// slot's correction table; characters without an entry pass through.
///
/// Only meaningful for text that [`is_compliant`] accepts. Anything else is
/// rewritten slot by slot as far as the template reaches and copied verbatim
/// beyond it.
pub fn correct(text: &str) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| match TEMPLATE.get(i) {
            Some(slot) => lookup(slot.corrections(), c).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// Validates, then corrects.
pub fn try_correct(text: &str) -> Option<String> {
    is_compliant(text).then(|| correct(text))
}
