//!
//! Card type catalog and classification of card numbers by issuer prefix.
//!

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Card brands known to the gateway.
///
/// Variants are declared in catalog order. When two brands match a number equally well, the one
/// declared first wins.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardType {
    Visa,
    MasterCard,
    Maestro,
    #[serde(rename = "amex")]
    #[strum(serialize = "amex")]
    AmericanExpress,
    DinersClub,
    Discover,
    Jcb,
}

/// Static description of a card brand.
#[derive(Debug)]
pub struct CardTypeDefinition {
    pub card_type: CardType,
    pub label: &'static str,
    /// Permitted number lengths in digits.
    pub number_lengths: &'static [usize],
    /// Anchored patterns over the leading digits. A range such as 222100-272099 is written to
    /// match exactly as many digits as its bounds, so the match width is the prefix length.
    pub number_prefixes: &'static [&'static str],
    pub security_code_length: usize,
}

const VISA: CardTypeDefinition = CardTypeDefinition {
    card_type: CardType::Visa,
    label: "Visa",
    number_lengths: &[13, 16, 19],
    number_prefixes: &[r"^4"],
    security_code_length: 3,
};

const MASTERCARD: CardTypeDefinition = CardTypeDefinition {
    card_type: CardType::MasterCard,
    label: "MasterCard",
    number_lengths: &[16],
    number_prefixes: &[
        r"^5[1-5]",
        r"^(?:222[1-9]|22[3-9][0-9]|2[3-6][0-9]{2}|27[01][0-9]|2720)[0-9]{2}",
    ],
    security_code_length: 3,
};

const MAESTRO: CardTypeDefinition = CardTypeDefinition {
    card_type: CardType::Maestro,
    label: "Maestro",
    number_lengths: &[12, 13, 14, 15, 16, 17, 18, 19],
    number_prefixes: &[r"^(?:5018|5020|5038|5612|5893|6304|6759|676[1-3]|0604|6390)"],
    security_code_length: 3,
};

const AMERICAN_EXPRESS: CardTypeDefinition = CardTypeDefinition {
    card_type: CardType::AmericanExpress,
    label: "American Express",
    number_lengths: &[15],
    number_prefixes: &[r"^3[47]"],
    security_code_length: 4,
};

const DINERS_CLUB: CardTypeDefinition = CardTypeDefinition {
    card_type: CardType::DinersClub,
    label: "Diners Club",
    number_lengths: &[14],
    number_prefixes: &[r"^30[0-5]", r"^309", r"^36", r"^3[89]"],
    security_code_length: 3,
};

const DISCOVER: CardTypeDefinition = CardTypeDefinition {
    card_type: CardType::Discover,
    label: "Discover Card",
    number_lengths: &[16, 19],
    number_prefixes: &[
        r"^6011",
        r"^(?:62212[6-9]|6221[3-9][0-9]|622[2-8][0-9]{2}|6229[01][0-9]|62292[0-5])",
        r"^64[4-9]",
        r"^65",
    ],
    security_code_length: 3,
};

const JCB: CardTypeDefinition = CardTypeDefinition {
    card_type: CardType::Jcb,
    label: "JCB",
    number_lengths: &[16],
    number_prefixes: &[r"^35(?:2[89]|[3-8][0-9])"],
    security_code_length: 3,
};

/// Allow-list used when the gateway configuration names no card types.
pub const DEFAULT_ALLOWED_CARD_TYPES: [CardType; 3] = [
    CardType::AmericanExpress,
    CardType::MasterCard,
    CardType::Visa,
];

impl CardType {
    /// Every brand in catalog order.
    pub const ALL: [Self; 7] = [
        Self::Visa,
        Self::MasterCard,
        Self::Maestro,
        Self::AmericanExpress,
        Self::DinersClub,
        Self::Discover,
        Self::Jcb,
    ];

    pub fn definition(self) -> &'static CardTypeDefinition {
        match self {
            Self::Visa => &VISA,
            Self::MasterCard => &MASTERCARD,
            Self::Maestro => &MAESTRO,
            Self::AmericanExpress => &AMERICAN_EXPRESS,
            Self::DinersClub => &DINERS_CLUB,
            Self::Discover => &DISCOVER,
            Self::Jcb => &JCB,
        }
    }

    /// Human readable brand name, e.g. `American Express`.
    pub fn label(self) -> &'static str {
        self.definition().label
    }

    pub fn number_lengths(self) -> &'static [usize] {
        self.definition().number_lengths
    }

    pub fn security_code_length(self) -> usize {
        self.definition().security_code_length
    }

    /// Length of the longest prefix of this brand that `digits` starts with.
    fn prefix_match_len(self, digits: &str) -> Option<usize> {
        PREFIX_PATTERNS
            .get(&self)?
            .iter()
            .filter_map(|pattern| pattern.find(digits))
            .map(|found| found.end())
            .max()
    }
}

static PREFIX_PATTERNS: LazyLock<HashMap<CardType, Vec<Regex>>> = LazyLock::new(|| {
    CardType::ALL
        .into_iter()
        .map(|card_type| {
            let patterns = card_type
                .definition()
                .number_prefixes
                .iter()
                .filter_map(|pattern| Regex::new(pattern).ok())
                .collect();
            (card_type, patterns)
        })
        .collect()
});

/// Determine which allowed brand a card number belongs to.
///
/// Non-digit characters are ignored. A brand whose permitted lengths include the number's length
/// is preferred over one that only matches by prefix. Among those, the longest matching prefix
/// wins, and remaining ties go to the brand declared first in [`CardType::ALL`].
///
/// Returns `None` when no allowed brand has a prefix matching the number.
pub fn classify(number: &str, allowed: &[CardType]) -> Option<CardType> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let mut best: Option<((bool, usize), CardType)> = None;
    for card_type in CardType::ALL.into_iter().filter(|ty| allowed.contains(ty)) {
        let Some(prefix_len) = card_type.prefix_match_len(&digits) else {
            continue;
        };
        let rank = (card_type.number_lengths().contains(&digits.len()), prefix_len);
        if !best.is_some_and(|(best_rank, _)| rank <= best_rank) {
            best = Some((rank, card_type));
        }
    }

    best.map(|(_, card_type)| card_type)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use std::str::FromStr;

    use test_case::test_case;

    use super::*;

    #[test_case("4111111111111111", CardType::Visa ; "visa")]
    #[test_case("4222222222222", CardType::Visa ; "visa thirteen digits")]
    #[test_case("5555555555554444", CardType::MasterCard ; "mastercard 5 series")]
    #[test_case("2221000000000009", CardType::MasterCard ; "mastercard 2 series")]
    #[test_case("378282246310005", CardType::AmericanExpress ; "amex")]
    #[test_case("6011111111111117", CardType::Discover ; "discover")]
    #[test_case("6221260000000000", CardType::Discover ; "discover unionpay range")]
    #[test_case("30569309025904", CardType::DinersClub ; "diners")]
    #[test_case("38520000023237", CardType::DinersClub ; "diners 38")]
    #[test_case("3530111333300000", CardType::Jcb ; "jcb")]
    #[test_case("6759649826438453", CardType::Maestro ; "maestro")]
    #[test_case("6761000000000006", CardType::Maestro ; "maestro range")]
    fn classifies_catalog_numbers(number: &str, expected: CardType) {
        assert_eq!(classify(number, &CardType::ALL), Some(expected));
    }

    #[test]
    fn ignores_separators() {
        assert_eq!(
            classify("4111 1111-1111 1111", &CardType::ALL),
            Some(CardType::Visa)
        );
    }

    #[test]
    fn respects_allow_list() {
        assert_eq!(
            classify("6011111111111117", &DEFAULT_ALLOWED_CARD_TYPES),
            None
        );
        assert_eq!(
            classify("378282246310005", &DEFAULT_ALLOWED_CARD_TYPES),
            Some(CardType::AmericanExpress)
        );
    }

    #[test]
    fn unknown_prefix_is_unclassified() {
        assert_eq!(classify("9999999999999995", &CardType::ALL), None);
        assert_eq!(classify("", &CardType::ALL), None);
        assert_eq!(classify("not a number", &CardType::ALL), None);
    }

    #[test]
    fn fitting_length_beats_prefix_only_match() {
        // 13 digits fits Visa but not MasterCard or Maestro.
        assert_eq!(classify("4222222222222", &CardType::ALL), Some(CardType::Visa));
        // 15 digits fits no Visa length, but the prefix still identifies the brand.
        assert_eq!(
            classify("411111111111111", &CardType::ALL),
            Some(CardType::Visa)
        );
    }

    #[test]
    fn every_prefix_pattern_compiles() {
        for card_type in CardType::ALL {
            assert_eq!(
                PREFIX_PATTERNS[&card_type].len(),
                card_type.definition().number_prefixes.len(),
                "{card_type}"
            );
        }
    }

    #[test_case("2221001234567890", Some(6) ; "mastercard range low bound")]
    #[test_case("2720991234567890", Some(6) ; "mastercard range high bound")]
    #[test_case("2221", None ; "range needs all bound digits")]
    #[test_case("2721001234567890", None ; "above mastercard range")]
    #[test_case("2220991234567890", None ; "below mastercard range")]
    #[test_case("5212345678901234", Some(2) ; "mastercard 5 series")]
    #[test_case("5", None ; "shorter than prefix")]
    fn mastercard_prefix_width(digits: &str, expected: Option<usize>) {
        assert_eq!(CardType::MasterCard.prefix_match_len(digits), expected);
    }

    #[test]
    fn discover_range_bounds() {
        assert_eq!(CardType::Discover.prefix_match_len("6221260000000000"), Some(6));
        assert_eq!(CardType::Discover.prefix_match_len("6229250000000000"), Some(6));
        assert_eq!(CardType::Discover.prefix_match_len("6221250000000000"), None);
        assert_eq!(CardType::Discover.prefix_match_len("6229260000000000"), None);
    }

    #[test]
    fn ids_round_trip_through_strum_and_serde() {
        assert_eq!(CardType::AmericanExpress.to_string(), "amex");
        assert_eq!(CardType::MasterCard.to_string(), "mastercard");
        assert_eq!(CardType::DinersClub.to_string(), "dinersclub");
        assert_eq!(CardType::from_str("jcb").unwrap(), CardType::Jcb);
        assert_eq!(
            serde_json::from_str::<CardType>(r#""amex""#).unwrap(),
            CardType::AmericanExpress
        );
        assert_eq!(
            serde_json::to_string(&CardType::Maestro).unwrap(),
            r#""maestro""#
        );
    }

    #[test]
    fn labels_come_from_catalog() {
        assert_eq!(CardType::AmericanExpress.label(), "American Express");
        assert_eq!(CardType::AmericanExpress.security_code_length(), 4);
        assert_eq!(CardType::Visa.security_code_length(), 3);
    }
}
