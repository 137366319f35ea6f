// 🌐 Locale conventions - how numbers, money and dates look per region
//
// A locale tag ("en-US", "de_DE", "fr") resolves to a static profile. Month names
// and AM/PM markers come from chrono's locale tables; grouping, decimal marks and
// USD symbol placement follow the CLDR conventions for each region.
//
// Unknown tags fall back to the language's first profile, then to en-US.

use chrono::Locale;

pub const DEFAULT_LOCALE: &str = "en-US";

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

// ============================================================================
// LOCALE PROFILE
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct LocaleProfile {
    /// Canonical IETF tag
    pub tag: &'static str,

    /// chrono locale used for month abbreviations and AM/PM
    pub chrono_locale: Locale,

    pub group_separator: &'static str,
    pub decimal_separator: &'static str,

    /// Integer digits required before grouping kicks in (es-ES writes "1234" but "12.345")
    pub min_grouping_digits: usize,

    /// How USD is written in this locale
    pub currency_symbol: &'static str,
    pub symbol_first: bool,
    pub symbol_spacing: &'static str,

    /// strftime patterns
    pub date_pattern: &'static str,
    pub time_pattern: &'static str,
    pub date_time_joiner: &'static str,
}

static PROFILES: [LocaleProfile; 7] = [
    LocaleProfile {
        tag: "en-US",
        chrono_locale: Locale::en_US,
        group_separator: ",",
        decimal_separator: ".",
        min_grouping_digits: 1,
        currency_symbol: "$",
        symbol_first: true,
        symbol_spacing: "",
        date_pattern: "%b %-d, %Y",
        time_pattern: "%I:%M %p",
        date_time_joiner: ", ",
    },
    LocaleProfile {
        tag: "en-GB",
        chrono_locale: Locale::en_GB,
        group_separator: ",",
        decimal_separator: ".",
        min_grouping_digits: 1,
        currency_symbol: "US$",
        symbol_first: true,
        symbol_spacing: "",
        date_pattern: "%-d %b %Y",
        time_pattern: "%H:%M",
        date_time_joiner: ", ",
    },
    LocaleProfile {
        tag: "de-DE",
        chrono_locale: Locale::de_DE,
        group_separator: ".",
        decimal_separator: ",",
        min_grouping_digits: 1,
        currency_symbol: "$",
        symbol_first: false,
        symbol_spacing: NBSP,
        date_pattern: "%-d. %b %Y",
        time_pattern: "%H:%M",
        date_time_joiner: ", ",
    },
    LocaleProfile {
        tag: "fr-FR",
        chrono_locale: Locale::fr_FR,
        group_separator: NARROW_NBSP,
        decimal_separator: ",",
        min_grouping_digits: 1,
        currency_symbol: "$US",
        symbol_first: false,
        symbol_spacing: NBSP,
        date_pattern: "%-d %b %Y",
        time_pattern: "%H:%M",
        date_time_joiner: ", ",
    },
    LocaleProfile {
        tag: "es-ES",
        chrono_locale: Locale::es_ES,
        group_separator: ".",
        decimal_separator: ",",
        min_grouping_digits: 2,
        currency_symbol: "US$",
        symbol_first: false,
        symbol_spacing: NBSP,
        date_pattern: "%-d %b %Y",
        time_pattern: "%H:%M",
        date_time_joiner: ", ",
    },
    LocaleProfile {
        tag: "es-MX",
        chrono_locale: Locale::es_MX,
        group_separator: ",",
        decimal_separator: ".",
        min_grouping_digits: 1,
        currency_symbol: "USD",
        symbol_first: true,
        symbol_spacing: NBSP,
        date_pattern: "%-d %b %Y",
        time_pattern: "%H:%M",
        date_time_joiner: ", ",
    },
    LocaleProfile {
        tag: "pt-BR",
        chrono_locale: Locale::pt_BR,
        group_separator: ".",
        decimal_separator: ",",
        min_grouping_digits: 1,
        currency_symbol: "US$",
        symbol_first: true,
        symbol_spacing: NBSP,
        date_pattern: "%-d de %b de %Y",
        time_pattern: "%H:%M",
        date_time_joiner: ", ",
    },
];

impl LocaleProfile {
    /// Resolve a locale tag to a profile. Never fails.
    pub fn resolve(tag: &str) -> &'static LocaleProfile {
        let normalized = tag.trim().replace('_', "-");

        if let Some(profile) = PROFILES
            .iter()
            .find(|p| p.tag.eq_ignore_ascii_case(&normalized))
        {
            return profile;
        }

        let language = normalized.split('-').next().unwrap_or_default();
        if let Some(profile) = PROFILES.iter().find(|p| {
            p.tag
                .split('-')
                .next()
                .is_some_and(|l| l.eq_ignore_ascii_case(language))
        }) {
            tracing::debug!(requested = %tag, resolved = profile.tag, "locale resolved by language");
            return profile;
        }

        tracing::debug!(requested = %tag, "unknown locale, using {}", DEFAULT_LOCALE);
        &PROFILES[0]
    }

    /// All locale tags with a dedicated profile
    pub fn supported_tags() -> impl Iterator<Item = &'static str> {
        PROFILES.iter().map(|p| p.tag)
    }

    pub fn is_supported(tag: &str) -> bool {
        let normalized = tag.trim().replace('_', "-");
        PROFILES.iter().any(|p| {
            p.tag.eq_ignore_ascii_case(&normalized)
                || p.tag
                    .split('-')
                    .next()
                    .is_some_and(|l| l.eq_ignore_ascii_case(&normalized))
        })
    }

    /// Insert group separators into a run of ASCII integer digits.
    pub fn group_digits(&self, digits: &str) -> String {
        if digits.len() < 3 + self.min_grouping_digits {
            return digits.to_string();
        }

        let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
        let lead = digits.len() % 3;
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - lead) % 3 == 0 {
                out.push_str(self.group_separator);
            }
            out.push(ch);
        }
        out
    }

    /// Localize a plain fixed-point string ("-1234.50") into grouped digits
    /// with this locale's decimal mark. The sign is returned separately.
    pub fn localize_fixed(&self, fixed: &str) -> (bool, String) {
        let (negative, unsigned) = match fixed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, fixed),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        let mut out = self.group_digits(int_part);
        if let Some(frac) = frac_part {
            out.push_str(self.decimal_separator);
            out.push_str(frac);
        }
        (negative, out)
    }

    /// Attach the USD symbol and sign around an already-localized number.
    pub fn wrap_currency(&self, negative: bool, number: &str) -> String {
        let sign = if negative { "-" } else { "" };
        if self.symbol_first {
            format!("{}{}{}{}", sign, self.currency_symbol, self.symbol_spacing, number)
        } else {
            format!("{}{}{}{}", sign, number, self.symbol_spacing, self.currency_symbol)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
