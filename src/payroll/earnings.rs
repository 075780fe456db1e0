use rust_decimal::Decimal;

use crate::payroll::error::{PayrollError, PayrollResult};
use crate::payroll::tables::RateTables;
use crate::payroll::{HoursWorked, Supplement};

/// Itemized gross earnings for one pay period.
#[derive(Debug, Clone, PartialEq)]
pub struct GrossEarnings {
    pub base_proportional: Decimal,
    pub overtime_normal_pay: Decimal,
    pub overtime_night_pay: Decimal,
    pub supplements_total: Decimal,
    pub gross: Decimal,
}

/// Combines base salary, overtime and supplements into gross earnings.
///
/// The hourly rate is `base_monthly / standard_monthly_hours`. Ordinary
/// hours default to the full-time baseline when the period has no record;
/// overtime kinds carry their own table-configured multipliers.
pub fn aggregate_components(
    base_monthly: Decimal,
    hours: &HoursWorked,
    supplements: &[Supplement],
    tables: &RateTables,
) -> PayrollResult<GrossEarnings> {
    if base_monthly < Decimal::ZERO {
        return Err(PayrollError::Validation(format!(
            "negative base salary: {base_monthly}"
        )));
    }

    let baseline = tables.standard_monthly_hours;
    if baseline <= Decimal::ZERO {
        return Err(PayrollError::Configuration(format!(
            "standard_monthly_hours must be positive, got {baseline}"
        )));
    }

    let ordinary = hours.ordinary.unwrap_or(baseline);
    for (label, value) in [
        ("ordinary", ordinary),
        ("overtime_normal", hours.overtime_normal),
        ("overtime_night", hours.overtime_night),
    ] {
        if value < Decimal::ZERO {
            return Err(PayrollError::Validation(format!(
                "negative {label} hours: {value}"
            )));
        }
    }

    for supplement in supplements {
        if supplement.amount < Decimal::ZERO {
            return Err(PayrollError::Validation(format!(
                "negative supplement '{}': {}",
                supplement.concept, supplement.amount
            )));
        }
    }

    let hourly_rate = base_monthly / baseline;
    let base_proportional = hourly_rate * ordinary;
    let overtime_normal_pay = hourly_rate * tables.overtime_multiplier * hours.overtime_normal;
    let overtime_night_pay = hourly_rate * tables.night_overtime_multiplier * hours.overtime_night;
    let supplements_total: Decimal = supplements.iter().map(|s| s.amount).sum();

    let gross = base_proportional + overtime_normal_pay + overtime_night_pay + supplements_total;

    Ok(GrossEarnings {
        base_proportional,
        overtime_normal_pay,
        overtime_night_pay,
        supplements_total,
        gross,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::tables::test_tables;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn full_month() -> HoursWorked {
        HoursWorked {
            ordinary: Some(dec("160")),
            overtime_normal: Decimal::ZERO,
            overtime_night: Decimal::ZERO,
        }
    }

    #[test]
    fn full_month_pays_full_base() {
        let result =
            aggregate_components(dec("2000"), &full_month(), &[], &test_tables()).unwrap();
        assert_eq!(result.base_proportional, dec("2000"));
        assert_eq!(result.gross, dec("2000"));
    }

    #[test]
    fn missing_ordinary_hours_default_to_baseline() {
        let hours = HoursWorked {
            ordinary: None,
            overtime_normal: Decimal::ZERO,
            overtime_night: Decimal::ZERO,
        };
        let result = aggregate_components(dec("2000"), &hours, &[], &test_tables()).unwrap();
        assert_eq!(result.gross, dec("2000"));
    }

    #[test]
    fn overtime_at_one_and_a_half_times() {
        let hours = HoursWorked {
            ordinary: Some(dec("160")),
            overtime_normal: dec("10"),
            overtime_night: Decimal::ZERO,
        };
        let result = aggregate_components(dec("2000"), &hours, &[], &test_tables()).unwrap();
        // 2000/160 = 12.5/h; 10h x 12.5 x 1.5 = 187.50
        assert_eq!(result.overtime_normal_pay, dec("187.50"));
        assert_eq!(result.gross, dec("2187.50"));
    }

    #[test]
    fn night_overtime_uses_its_own_multiplier() {
        let hours = HoursWorked {
            ordinary: Some(dec("160")),
            overtime_normal: Decimal::ZERO,
            overtime_night: dec("4"),
        };
        let result = aggregate_components(dec("2000"), &hours, &[], &test_tables()).unwrap();
        // 4h x 12.5 x 1.75 = 87.50
        assert_eq!(result.overtime_night_pay, dec("87.50"));
    }

    #[test]
    fn supplements_sum_into_gross() {
        let supplements = vec![
            Supplement { concept: "Transport".into(), amount: dec("90.50") },
            Supplement { concept: "Languages".into(), amount: dec("120") },
        ];
        let result =
            aggregate_components(dec("2000"), &full_month(), &supplements, &test_tables()).unwrap();
        assert_eq!(result.supplements_total, dec("210.50"));
        assert_eq!(result.gross, dec("2210.50"));
    }

    #[test]
    fn supplement_order_does_not_matter() {
        let mut supplements = vec![
            Supplement { concept: "A".into(), amount: dec("10.10") },
            Supplement { concept: "B".into(), amount: dec("20.20") },
            Supplement { concept: "C".into(), amount: dec("30.30") },
        ];
        let forward =
            aggregate_components(dec("1800"), &full_month(), &supplements, &test_tables()).unwrap();
        supplements.reverse();
        let backward =
            aggregate_components(dec("1800"), &full_month(), &supplements, &test_tables()).unwrap();
        assert_eq!(forward.gross, backward.gross);
    }

    #[test]
    fn negative_hours_rejected() {
        let hours = HoursWorked {
            ordinary: Some(dec("-1")),
            overtime_normal: Decimal::ZERO,
            overtime_night: Decimal::ZERO,
        };
        match aggregate_components(dec("2000"), &hours, &[], &test_tables()) {
            Err(PayrollError::Validation(msg)) => assert!(msg.contains("ordinary")),
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn zero_baseline_is_configuration_error() {
        let mut tables = test_tables();
        tables.standard_monthly_hours = Decimal::ZERO;
        assert!(matches!(
            aggregate_components(dec("2000"), &full_month(), &[], &tables),
            Err(PayrollError::Configuration(_))
        ));
    }

    #[test]
    fn part_time_month_is_proportional() {
        let hours = HoursWorked {
            ordinary: Some(dec("80")),
            overtime_normal: Decimal::ZERO,
            overtime_night: Decimal::ZERO,
        };
        let result = aggregate_components(dec("2000"), &hours, &[], &test_tables()).unwrap();
        assert_eq!(result.base_proportional, dec("1000"));
    }
}
