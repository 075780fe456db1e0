use rust_decimal::Decimal;

use crate::payroll::error::{PayrollError, PayrollResult};
use crate::payroll::tables::ContributionRate;

/// Monthly-equivalent share of the extra annual payments ("pagas").
///
/// A contract paid in 14 installments spreads two extra payments of
/// `base + supplements` across the year; with 12 installments there is
/// nothing to prorate and the result is exactly zero.
pub fn bonus_proration(
    base_monthly: Decimal,
    supplements_total: Decimal,
    annual_payments: u32,
) -> PayrollResult<Decimal> {
    if annual_payments < 12 {
        return Err(PayrollError::Validation(format!(
            "annual_payments must be at least 12, got {annual_payments}"
        )));
    }
    let extra = Decimal::from(annual_payments - 12);
    Ok((base_monthly + supplements_total) * extra / Decimal::from(12))
}

/// Itemized employee-side social security deductions.
#[derive(Debug, Clone, PartialEq)]
pub struct SocialSecurity {
    pub items: Vec<(String, Decimal)>,
    pub total: Decimal,
}

/// Applies the injected rate table to the contribution base. The table is
/// yearly regulatory configuration; this function never assumes any rate.
pub fn social_security_deductions(
    contribution_base: Decimal,
    rates: &[ContributionRate],
) -> PayrollResult<SocialSecurity> {
    if rates.is_empty() {
        return Err(PayrollError::Configuration(
            "social security rate table is empty".into(),
        ));
    }

    let mut items = Vec::with_capacity(rates.len());
    let mut total = Decimal::ZERO;
    for rate in rates {
        let amount = contribution_base * rate.rate;
        total += amount;
        items.push((rate.concept.clone(), amount));
    }

    Ok(SocialSecurity { items, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::tables::test_tables;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn twelve_payments_prorate_to_zero() {
        assert_eq!(
            bonus_proration(dec("2000"), dec("0"), 12).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            bonus_proration(dec("3517.42"), dec("812.99"), 12).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn fourteen_payments_spread_two_extra_installments() {
        // 2000 x 2 / 12 = 333.33 (2 dp)
        let proration = bonus_proration(dec("2000"), dec("0"), 14).unwrap();
        assert_eq!(proration.round_dp(2), dec("333.33"));

        let base = dec("2000") + proration;
        assert_eq!(base.round_dp(2), dec("2333.33"));
    }

    #[test]
    fn supplements_count_toward_proration() {
        // (1800 + 200) x 2 / 12 = 333.33...
        let proration = bonus_proration(dec("1800"), dec("200"), 14).unwrap();
        assert_eq!(proration.round_dp(2), dec("333.33"));
    }

    #[test]
    fn fewer_than_twelve_payments_rejected() {
        match bonus_proration(dec("2000"), dec("0"), 11) {
            Err(PayrollError::Validation(msg)) => assert!(msg.contains("annual_payments")),
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn deductions_follow_the_injected_table() {
        let tables = test_tables();
        let result = social_security_deductions(dec("2000"), &tables.social_security).unwrap();

        // 4.70 + 1.55 + 0.10 + 0.15 = 6.50 % of 2000
        assert_eq!(result.total, dec("130.00"));
        assert_eq!(result.items.len(), 4);
        assert_eq!(result.items[0], ("Common contingencies".into(), dec("94.00")));
        assert_eq!(result.items[1], ("Unemployment".into(), dec("31.00")));
    }

    #[test]
    fn total_is_sum_of_items() {
        let tables = test_tables();
        let result = social_security_deductions(dec("2733.33"), &tables.social_security).unwrap();
        let summed: Decimal = result.items.iter().map(|(_, amount)| *amount).sum();
        assert_eq!(result.total, summed);
    }

    #[test]
    fn empty_rate_table_is_configuration_error() {
        assert!(matches!(
            social_security_deductions(dec("2000"), &[]),
            Err(PayrollError::Configuration(_))
        ));
    }
}
