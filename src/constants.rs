//! Static tables: the Google News topic set and the language and location
//! codes the aggregator accepts for `hl`/`gl`.

use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Base URL of the aggregator.
pub const GOOGLE_NEWS_URL: &str = "https://news.google.com/";

/// Hard upper bound on the number of articles a single query may return.
pub const MAX_RESULTS: usize = 100;

/// Headline sections served under `rss/headlines/section/topic/<NAME>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    World,
    Nation,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::World,
        Topic::Nation,
        Topic::Business,
        Topic::Technology,
        Topic::Entertainment,
        Topic::Sports,
        Topic::Science,
        Topic::Health,
    ];

    /// Upper-case section name used in the feed path.
    pub fn name(self) -> &'static str {
        match self {
            Topic::World => "WORLD",
            Topic::Nation => "NATION",
            Topic::Business => "BUSINESS",
            Topic::Technology => "TECHNOLOGY",
            Topic::Entertainment => "ENTERTAINMENT",
            Topic::Sports => "SPORTS",
            Topic::Science => "SCIENCE",
            Topic::Health => "HEALTH",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topic {
    type Err = ValidationError;

    /// Case-insensitive. Empty input is `EmptyTopic`, anything outside the
    /// fixed set is `InvalidTopic`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        let upper = trimmed.to_uppercase();
        Topic::ALL
            .into_iter()
            .find(|t| t.name() == upper)
            .ok_or_else(|| ValidationError::InvalidTopic(trimmed.to_string()))
    }
}

/// `(name, hl code)` pairs.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("english", "en"),
    ("indonesian", "id"),
    ("czech", "cs"),
    ("german", "de"),
    ("spanish", "es-419"),
    ("french", "fr"),
    ("italian", "it"),
    ("latvian", "lv"),
    ("lithuanian", "lt"),
    ("hungarian", "hu"),
    ("dutch", "nl"),
    ("norwegian", "no"),
    ("polish", "pl"),
    ("portuguese brasil", "pt-419"),
    ("portuguese portugal", "pt-150"),
    ("romanian", "ro"),
    ("slovak", "sk"),
    ("slovenian", "sl"),
    ("swedish", "sv"),
    ("vietnamese", "vi"),
    ("turkish", "tr"),
    ("greek", "el"),
    ("bulgarian", "bg"),
    ("russian", "ru"),
    ("serbian", "sr"),
    ("ukrainian", "uk"),
    ("hebrew", "he"),
    ("arabic", "ar"),
    ("marathi", "mr"),
    ("hindi", "hi"),
    ("bengali", "bn"),
    ("tamil", "ta"),
    ("telugu", "te"),
    ("malyalam", "ml"),
    ("thai", "th"),
    ("chinese simplified", "zh-Hans"),
    ("chinese traditional", "zh-Hant"),
    ("japanese", "ja"),
    ("korean", "ko"),
];

/// `(name, gl code)` pairs.
pub const LOCATIONS: &[(&str, &str)] = &[
    ("australia", "AU"),
    ("botswana", "BW"),
    ("canada", "CA"),
    ("ethiopia", "ET"),
    ("ghana", "GH"),
    ("india", "IN"),
    ("indonesia", "ID"),
    ("ireland", "IE"),
    ("israel", "IL"),
    ("kenya", "KE"),
    ("latvia", "LV"),
    ("malaysia", "MY"),
    ("namibia", "NA"),
    ("new zealand", "NZ"),
    ("nigeria", "NG"),
    ("pakistan", "PK"),
    ("philippines", "PH"),
    ("singapore", "SG"),
    ("south africa", "ZA"),
    ("tanzania", "TZ"),
    ("uganda", "UG"),
    ("united kingdom", "GB"),
    ("united states", "US"),
    ("zimbabwe", "ZW"),
    ("czech republic", "CZ"),
    ("germany", "DE"),
    ("austria", "AT"),
    ("switzerland", "CH"),
    ("argentina", "AR"),
    ("chile", "CL"),
    ("colombia", "CO"),
    ("cuba", "CU"),
    ("mexico", "MX"),
    ("peru", "PE"),
    ("venezuela", "VE"),
    ("belgium", "BE"),
    ("france", "FR"),
    ("morocco", "MA"),
    ("senegal", "SN"),
    ("italy", "IT"),
    ("lithuania", "LT"),
    ("hungary", "HU"),
    ("netherlands", "NL"),
    ("norway", "NO"),
    ("poland", "PL"),
    ("brazil", "BR"),
    ("portugal", "PT"),
    ("romania", "RO"),
    ("slovakia", "SK"),
    ("slovenia", "SI"),
    ("sweden", "SE"),
    ("vietnam", "VN"),
    ("turkey", "TR"),
    ("greece", "GR"),
    ("bulgaria", "BG"),
    ("russia", "RU"),
    ("ukraine", "UA"),
    ("serbia", "RS"),
    ("united arab emirates", "AE"),
    ("saudi arabia", "SA"),
    ("lebanon", "LB"),
    ("egypt", "EG"),
    ("bangladesh", "BD"),
    ("thailand", "TH"),
    ("china", "CN"),
    ("taiwan", "TW"),
    ("hong kong", "HK"),
    ("japan", "JP"),
    ("republic of korea", "KR"),
];

/// Map a language name (`"chinese traditional"`) to its code. Codes pass through.
pub fn language_code(name_or_code: &str) -> Option<&'static str> {
    lookup(LANGUAGES, name_or_code)
}

/// Map a location name (`"taiwan"`) to its code. Codes pass through.
pub fn location_code(name_or_code: &str) -> Option<&'static str> {
    lookup(LOCATIONS, name_or_code)
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    let lower = key.trim().to_lowercase();
    table
        .iter()
        .find(|(name, code)| *name == lower || code.to_lowercase() == lower)
        .map(|(_, code)| *code)
}
