#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use cards::{classify, validate_expiration_at, validate_number, CardType};
use proptest::prelude::*;
use time::{macros::datetime, Duration};

/// Append the digit that makes `body` a valid `card_type` number.
fn with_check_digit(body: &str, card_type: CardType) -> String {
    (0..10)
        .map(|d| format!("{body}{d}"))
        .find(|candidate| validate_number(candidate, card_type))
        .unwrap()
}

/// Every number that differs from `number` in exactly one digit.
fn single_digit_changes(number: &str) -> Vec<String> {
    let digits: Vec<char> = number.chars().collect();
    let mut changed = Vec::new();
    for position in 0..digits.len() {
        for replacement in ('0'..='9').filter(|d| *d != digits[position]) {
            let mut perturbed = digits.clone();
            perturbed[position] = replacement;
            changed.push(perturbed.into_iter().collect());
        }
    }
    changed
}

#[test]
fn expiration_holds_through_the_whole_month() {
    let mut now = datetime!(2025-11-01 00:00:00);
    while now < datetime!(2025-12-01 00:00:00) {
        assert!(validate_expiration_at(11, 2025, now));
        now += Duration::hours(7);
    }
    assert!(!validate_expiration_at(11, 2025, datetime!(2025-12-01 00:00:00)));
}

proptest! {
    #[test]
    fn generated_visa_numbers_validate(body in "[0-9]{14}") {
        let number = with_check_digit(&format!("4{body}"), CardType::Visa);
        prop_assert_eq!(classify(&number, &CardType::ALL), Some(CardType::Visa));
        prop_assert!(validate_number(&number, CardType::Visa));
    }

    #[test]
    fn generated_amex_numbers_validate(second in "[47]", body in "[0-9]{12}") {
        let number = with_check_digit(&format!("3{second}{body}"), CardType::AmericanExpress);
        prop_assert_eq!(classify(&number, &CardType::ALL), Some(CardType::AmericanExpress));
        prop_assert!(validate_number(&number, CardType::AmericanExpress));
    }

    #[test]
    fn single_digit_changes_fail_validation(
        brand in prop::sample::select(vec![
            (CardType::Visa, "4"),
            (CardType::MasterCard, "55"),
            (CardType::AmericanExpress, "37"),
            (CardType::Discover, "6011"),
        ]),
        seed in "[0-9]{15}",
    ) {
        let (card_type, prefix) = brand;
        // Digits before the check digit, for the brand's first permitted length.
        let width = card_type.number_lengths()[0] - 1;
        let body = format!("{prefix}{}", &seed[..width - prefix.len()]);
        let number = with_check_digit(&body, card_type);
        prop_assert!(validate_number(&number, card_type));

        for perturbed in single_digit_changes(&number) {
            prop_assert!(!validate_number(&perturbed, card_type), "{} -> {}", number, perturbed);
        }
    }

    #[test]
    fn classification_is_deterministic(number in "[0-9 -]{0,24}") {
        prop_assert_eq!(
            classify(&number, &CardType::ALL),
            classify(&number, &CardType::ALL)
        );
    }

    #[test]
    fn classification_stays_within_allow_list(number in "[0-9]{12,19}") {
        let allowed = [CardType::Visa, CardType::Jcb];
        if let Some(card_type) = classify(&number, &allowed) {
            prop_assert!(allowed.contains(&card_type));
        }
    }

    #[test]
    fn non_digit_numbers_never_validate(number in "[0-9]{0,8}[a-z][0-9]{0,8}") {
        prop_assert!(!validate_number(&number, CardType::Maestro));
    }
}
