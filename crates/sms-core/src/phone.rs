use once_cell::sync::Lazy;
use regex::Regex;

// Ntc/Ncell mobile ranges 96x-99x, national format without country code.
static NEPAL_MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^9[6-9][0-9]{8}$").expect("valid nepal mobile pattern"));

static INTERNATIONAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid international pattern"));

/// Per-provider phone number format check.
///
/// These are format sanity checks, not carrier lookups. No normalization is
/// applied: spaces, dashes or a leading `+` where the rule does not allow one
/// make the number invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneValidator {
    /// Ten digits, `9` followed by `6..=9`, e.g. `9801234567`.
    NepalMobile,
    /// Optional leading `+`, then 10 to 15 digits.
    International,
}

impl PhoneValidator {
    pub fn validate(self, phone_number: &str) -> bool {
        match self {
            Self::NepalMobile => NEPAL_MOBILE.is_match(phone_number),
            Self::International => INTERNATIONAL.is_match(phone_number),
        }
    }
}
