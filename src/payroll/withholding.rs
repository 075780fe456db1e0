use rust_decimal::Decimal;

use crate::payroll::EmployeeAttrs;
use crate::payroll::error::PayrollResult;
use crate::payroll::tables::{RateTables, TaxBracket};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Result of the progressive withholding computation for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct Withholding {
    pub personal_allowance: Decimal,
    pub taxable_base: Decimal,
    pub annual_tax: Decimal,
    pub effective_rate: Decimal,
    pub monthly: Decimal,
}

/// Annual personal/family allowance: base amount by marital status, plus
/// per-dependent increments (first and second have their own values, every
/// later dependent uses the table's explicit additional increment), plus
/// the disability allowance when applicable.
fn personal_allowance(attrs: &EmployeeAttrs, tables: &RateTables) -> Decimal {
    let allowances = &tables.allowances;
    let mut total = allowances.base_allowance(attrs.marital_status);

    if attrs.dependents >= 1 {
        total += allowances.first_child;
    }
    if attrs.dependents >= 2 {
        total += allowances.second_child;
    }
    if attrs.dependents > 2 {
        total += allowances.additional_child * Decimal::from(attrs.dependents - 2);
    }
    if attrs.disability {
        total += allowances.disability;
    }

    total
}

/// Cumulative marginal tax over an ordered bracket table.
///
/// Each band `[lower, upper)` taxes only the portion of the base inside it;
/// a base sitting exactly on a bound never reaches the next band's rate.
/// Callers validate the table (ascending bounds, open-ended tail) first.
pub fn progressive_tax(taxable_base: Decimal, brackets: &[TaxBracket]) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;

    for bracket in brackets {
        let band_top = match bracket.upper_bound {
            Some(upper) => upper.min(taxable_base),
            None => taxable_base,
        };
        if band_top > lower {
            tax += (band_top - lower) * bracket.rate;
        }
        match bracket.upper_bound {
            Some(upper) if taxable_base > upper => lower = upper,
            _ => break,
        }
    }

    tax
}

/// Resolves the monthly withholding for a contribution base.
///
/// Annualizes the base, subtracts annualized social security and the
/// personal allowance (floored at zero), runs the marginal brackets, and
/// converts the resulting annual tax into an effective rate applied to the
/// monthly base. A zero annual base yields a zero rate rather than a
/// division error.
pub fn monthly_withholding(
    contribution_base: Decimal,
    ss_total: Decimal,
    attrs: &EmployeeAttrs,
    tables: &RateTables,
) -> PayrollResult<Withholding> {
    let annual_base = contribution_base * MONTHS_PER_YEAR;
    let allowance = personal_allowance(attrs, tables);

    let taxable_base =
        (annual_base - ss_total * MONTHS_PER_YEAR - allowance).max(Decimal::ZERO);

    let annual_tax = progressive_tax(taxable_base, &tables.brackets);

    let effective_rate = if annual_base.is_zero() {
        Decimal::ZERO
    } else {
        annual_tax / annual_base
    };

    Ok(Withholding {
        personal_allowance: allowance,
        taxable_base,
        annual_tax,
        effective_rate,
        monthly: contribution_base * effective_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::MaritalStatus;
    use crate::payroll::tables::test_tables;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn single_no_children() -> EmployeeAttrs {
        EmployeeAttrs {
            marital_status: MaritalStatus::Single,
            dependents: 0,
            disability: false,
        }
    }

    #[test]
    fn single_band_base() {
        // Entirely inside the first band.
        let tax = progressive_tax(dec("10000"), &test_tables().brackets);
        assert_eq!(tax, dec("1900.00"));
    }

    #[test]
    fn base_exactly_on_a_bound_stays_in_lower_band() {
        // 12450 is the first upper bound: all of it taxed at 19 %.
        let tax = progressive_tax(dec("12450"), &test_tables().brackets);
        assert_eq!(tax, dec("2365.50"));
    }

    #[test]
    fn one_unit_past_the_bound_enters_the_next_band() {
        let at_bound = progressive_tax(dec("12450"), &test_tables().brackets);
        let past_bound = progressive_tax(dec("12451"), &test_tables().brackets);
        assert_eq!(past_bound - at_bound, dec("0.24"));
    }

    #[test]
    fn spans_multiple_bands() {
        // 12450 @ 19% + (16890 - 12450) @ 24% = 2365.50 + 1065.60
        let tax = progressive_tax(dec("16890"), &test_tables().brackets);
        assert_eq!(tax, dec("3431.10"));
    }

    #[test]
    fn open_ended_band_taxes_the_remainder() {
        // 400000 reaches the 47 % tail band.
        let brackets = test_tables().brackets;
        let tax = progressive_tax(dec("400000"), &brackets);
        let at_cap = progressive_tax(dec("300000"), &brackets);
        assert_eq!(tax - at_cap, dec("100000") * dec("0.47"));
    }

    #[test]
    fn zero_taxable_base_zero_tax() {
        assert_eq!(
            progressive_tax(Decimal::ZERO, &test_tables().brackets),
            Decimal::ZERO
        );
    }

    #[test]
    fn tax_is_monotone_in_taxable_base() {
        let brackets = test_tables().brackets;
        let mut previous = Decimal::ZERO;
        for step in 0..200 {
            let base = Decimal::from(step) * dec("750");
            let tax = progressive_tax(base, &brackets);
            assert!(tax >= previous, "tax decreased at base {}", base);
            previous = tax;
        }
    }

    #[test]
    fn worked_example_single_2000() {
        // annual 24000, ss 130/mo -> 1560/yr, allowance 5550
        // taxable 16890 -> tax 3431.10, rate 0.1429625, monthly 285.925
        let result = monthly_withholding(
            dec("2000"),
            dec("130"),
            &single_no_children(),
            &test_tables(),
        )
        .unwrap();

        assert_eq!(result.taxable_base, dec("16890"));
        assert_eq!(result.annual_tax, dec("3431.10"));
        assert_eq!(result.effective_rate, dec("0.1429625"));
        assert_eq!(result.monthly, dec("285.9250"));
    }

    #[test]
    fn allowance_never_pushes_taxable_below_zero() {
        let result = monthly_withholding(
            dec("300"),
            dec("19.50"),
            &single_no_children(),
            &test_tables(),
        )
        .unwrap();

        // annual 3600 - 234 - 5550 < 0, floored
        assert_eq!(result.taxable_base, Decimal::ZERO);
        assert_eq!(result.annual_tax, Decimal::ZERO);
        assert_eq!(result.effective_rate, Decimal::ZERO);
        assert_eq!(result.monthly, Decimal::ZERO);
    }

    #[test]
    fn zero_base_yields_zero_rate_without_dividing() {
        let result = monthly_withholding(
            Decimal::ZERO,
            Decimal::ZERO,
            &single_no_children(),
            &test_tables(),
        )
        .unwrap();
        assert_eq!(result.effective_rate, Decimal::ZERO);
        assert_eq!(result.monthly, Decimal::ZERO);
    }

    #[test]
    fn first_two_dependents_use_distinct_increments() {
        let tables = test_tables();
        let one = EmployeeAttrs { dependents: 1, ..single_no_children() };
        let two = EmployeeAttrs { dependents: 2, ..single_no_children() };

        assert_eq!(
            personal_allowance(&one, &tables),
            dec("5550") + dec("2400")
        );
        assert_eq!(
            personal_allowance(&two, &tables),
            dec("5550") + dec("2400") + dec("2700")
        );
    }

    #[test]
    fn later_dependents_use_the_additional_increment() {
        let tables = test_tables();
        let four = EmployeeAttrs { dependents: 4, ..single_no_children() };
        assert_eq!(
            personal_allowance(&four, &tables),
            dec("5550") + dec("2400") + dec("2700") + dec("4000") * dec("2")
        );
    }

    #[test]
    fn married_sole_earner_gets_larger_base_allowance() {
        let tables = test_tables();
        let married = EmployeeAttrs {
            marital_status: MaritalStatus::MarriedSoleEarner,
            ..single_no_children()
        };
        assert_eq!(personal_allowance(&married, &tables), dec("8950"));
    }

    #[test]
    fn disability_adds_its_allowance() {
        let tables = test_tables();
        let disabled = EmployeeAttrs { disability: true, ..single_no_children() };
        assert_eq!(
            personal_allowance(&disabled, &tables),
            dec("5550") + dec("3000")
        );
    }

    #[test]
    fn higher_allowance_means_lower_withholding() {
        let tables = test_tables();
        let single = monthly_withholding(dec("2500"), dec("162.50"), &single_no_children(), &tables)
            .unwrap();
        let parent = monthly_withholding(
            dec("2500"),
            dec("162.50"),
            &EmployeeAttrs { dependents: 2, ..single_no_children() },
            &tables,
        )
        .unwrap();
        assert!(parent.monthly < single.monthly);
    }
}
