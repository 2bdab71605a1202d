use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

pub(crate) const DEFAULT_LOCALE: &str = "en";

/// Which differences a [`Collator`] treats as significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Base letters only: `a = á = A`.
    Base,
    /// Base letters and accents: `a ≠ á`, `a = A`.
    Accent,
    /// Base letters and case: `a ≠ A`, `a = á`.
    Case,
    /// Every difference counts.
    #[default]
    Variant,
}

/// Locale-aware string comparison used for the lexical fallback of table
/// sorting.
///
/// Comparison is multi-level: base letters first, then accents, then case
/// (lowercase before uppercase). Punctuation and whitespace order before
/// digits, digits before letters. Swedish places `å`, `ä`, `ö` after `z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collator {
    locale: String,
    sensitivity: Sensitivity,
}

impl Default for Collator {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CollationElement {
    primary: u32,
    secondary: u32,
    tertiary: u8,
}

impl Collator {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            sensitivity: Sensitivity::default(),
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        let left = self.collation_elements(left);
        let right = self.collation_elements(right);

        let by_level = |level: fn(&CollationElement) -> u32| {
            left.iter().map(level).cmp(right.iter().map(level))
        };

        by_level(|e| e.primary)
            .then_with(|| match self.sensitivity {
                Sensitivity::Accent | Sensitivity::Variant => by_level(|e| e.secondary),
                _ => Ordering::Equal,
            })
            .then_with(|| match self.sensitivity {
                Sensitivity::Case | Sensitivity::Variant => by_level(|e| u32::from(e.tertiary)),
                _ => Ordering::Equal,
            })
    }

    fn locale_family(&self) -> &str {
        self.locale
            .split(['-', '_'])
            .next()
            .unwrap_or(DEFAULT_LOCALE)
    }

    fn collation_elements(&self, src: &str) -> Vec<CollationElement> {
        let swedish = self.locale_family().eq_ignore_ascii_case("sv");
        let mut out = Vec::with_capacity(src.len());

        for ch in src.chars() {
            let tertiary = u8::from(ch.is_uppercase());
            if swedish {
                let tail_rank = match ch.to_lowercase().next().unwrap_or(ch) {
                    'å' => Some(27),
                    'ä' => Some(28),
                    'ö' => Some(29),
                    _ => None,
                };
                if let Some(rank) = tail_rank {
                    out.push(CollationElement {
                        primary: LETTER_BASE + rank,
                        secondary: 0,
                        tertiary,
                    });
                    continue;
                }
            }

            let mut decomposed = std::iter::once(ch).nfd();
            let base = decomposed.next().unwrap_or(ch);
            let secondary = decomposed
                .filter(|mark| is_combining_mark(*mark))
                .fold(0u32, |acc, mark| acc.wrapping_mul(31).wrapping_add(mark as u32));

            if is_combining_mark(base) {
                // A lone combining mark only adds an accent difference.
                if let Some(last) = out.last_mut() {
                    last.secondary = last.secondary.wrapping_mul(31).wrapping_add(base as u32);
                    continue;
                }
            }

            out.push(CollationElement {
                primary: primary_weight(base),
                secondary,
                tertiary,
            });
        }

        out
    }
}

const SYMBOL_BASE: u32 = 0x0100;
const DIGIT_BASE: u32 = 0x0800;
const LETTER_BASE: u32 = 0x1000;
const OTHER_BASE: u32 = 0x2000;

fn primary_weight(base: char) -> u32 {
    let lower = base.to_lowercase().next().unwrap_or(base);
    match lower {
        'a'..='z' => LETTER_BASE + (lower as u32 - 'a' as u32 + 1),
        '0'..='9' => DIGIT_BASE + (lower as u32 - '0' as u32),
        c if c.is_whitespace() || c.is_ascii_punctuation() => SYMBOL_BASE + c as u32,
        c => OTHER_BASE + c as u32,
    }
}
