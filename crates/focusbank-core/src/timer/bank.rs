//! Earn/spend accounting for the break bank.
//!
//! The bank balance is a signed number of seconds. Focused time earns rest
//! credit at 5:1; resting spends it 1:1. A negative balance is break debt
//! and persists until future work repays it.

use serde::{Deserialize, Serialize};

/// Seconds of focus that buy one second of rest.
pub const EARN_DIVISOR: i64 = 5;

/// How an ambiguous elapsed window is attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribution {
    /// The user was focused; the window earns rest credit.
    Working,
    /// The user was resting; the window spends the bank.
    Resting,
}

/// Credit earned by `elapsed` seconds of focus.
pub fn earn(elapsed_secs: i64) -> i64 {
    elapsed_secs.max(0) / EARN_DIVISOR
}

/// Cost of `elapsed` seconds of rest.
pub fn spend(elapsed_secs: i64) -> i64 {
    elapsed_secs.max(0)
}

/// Signed bank adjustment for attributing `elapsed` seconds.
pub fn bank_delta(attribution: Attribution, elapsed_secs: i64) -> i64 {
    match attribution {
        Attribution::Working => earn(elapsed_secs),
        Attribution::Resting => -spend(elapsed_secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn forty_five_second_window() {
        assert_eq!(bank_delta(Attribution::Working, 45), 9);
        assert_eq!(bank_delta(Attribution::Resting, 45), -45);
    }

    #[test]
    fn negative_elapsed_is_treated_as_zero() {
        assert_eq!(earn(-10), 0);
        assert_eq!(spend(-10), 0);
    }

    proptest! {
        #[test]
        fn earn_is_elapsed_over_five(e in 0i64..1_000_000) {
            prop_assert_eq!(bank_delta(Attribution::Working, e), e / 5);
        }

        #[test]
        fn spend_is_one_to_one(e in 0i64..1_000_000) {
            prop_assert_eq!(bank_delta(Attribution::Resting, e), -e);
        }

        #[test]
        fn earn_never_exceeds_spend(e in 0i64..1_000_000) {
            prop_assert!(bank_delta(Attribution::Working, e) <= spend(e));
        }
    }
}
