use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Regime;

/// Which regime to choose and how much it saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegimeComparison {
    pub recommended: Regime,
    pub savings: Decimal,
}

/// Recommends the cheaper regime. A tie goes to the old regime.
pub fn compare_regimes(
    old_tax: Decimal,
    new_tax: Decimal,
) -> RegimeComparison {
    let recommended = if old_tax <= new_tax {
        Regime::Old
    } else {
        Regime::New
    };
    RegimeComparison {
        recommended,
        savings: (old_tax - new_tax).abs(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn cheaper_new_regime_is_recommended() {
        let comparison = compare_regimes(dec!(117000), dec!(63700));

        assert_eq!(comparison.recommended, Regime::New);
        assert_eq!(comparison.savings, dec!(53300));
    }

    #[test]
    fn cheaper_old_regime_is_recommended() {
        let comparison = compare_regimes(dec!(20000), dec!(45000));

        assert_eq!(comparison.recommended, Regime::Old);
        assert_eq!(comparison.savings, dec!(25000));
    }

    #[test]
    fn tie_goes_to_old_regime() {
        let comparison = compare_regimes(dec!(52000), dec!(52000));

        assert_eq!(
            comparison,
            RegimeComparison {
                recommended: Regime::Old,
                savings: dec!(0),
            }
        );
    }
}
