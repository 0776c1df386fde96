use std::fmt;

/// Language code as returned by the detector, e.g. `en`, `es`, `zh-Hans`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn english() -> Self {
        Self("en".to_string())
    }

    /// Accepts tags shaped like `xx`, `xxx`, `xx-Yyyy`, `xx-YY`.
    /// Returns `None` for anything else (empty, whitespace, punctuation).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let mut subtags = raw.split('-');
        let primary = subtags.next()?;
        if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        for sub in subtags {
            if sub.is_empty() || sub.len() > 8 || !sub.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_english(&self) -> bool {
        self.0
            .split('-')
            .next()
            .is_some_and(|primary| primary.eq_ignore_ascii_case("en"))
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
