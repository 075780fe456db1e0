//! Deterministic payroll computation engine.
//!
//! A payslip is a pure function of (contract, supplements, hours, employee
//! attributes, yearly rate tables). No I/O happens here, no state is kept
//! between runs, and nothing is rounded before `PayslipResult::rounded`.

pub mod contribution;
pub mod earnings;
pub mod error;
pub mod tables;
pub mod withholding;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::payroll::contribution::{bonus_proration, social_security_deductions};
use crate::payroll::earnings::aggregate_components;
use crate::payroll::error::PayrollResult;
use crate::payroll::tables::RateTables;
use crate::payroll::withholding::monthly_withholding;

/// Marital/family situation as it affects the allowance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    MarriedSoleEarner,
    Other,
}

impl MaritalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::MarriedSoleEarner => "married_sole_earner",
            MaritalStatus::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "single" => Some(MaritalStatus::Single),
            "married_sole_earner" => Some(MaritalStatus::MarriedSoleEarner),
            "other" => Some(MaritalStatus::Other),
            _ => None,
        }
    }
}

/// The contract terms the engine needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractTerms {
    pub base_monthly: Decimal,
    pub annual_payments: u32,
}

/// A named recurring monthly amount tied to the contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Supplement {
    pub concept: String,
    pub amount: Decimal,
}

/// Hours worked in the period. `ordinary: None` means no record was kept
/// for the month and the full-time baseline applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoursWorked {
    pub ordinary: Option<Decimal>,
    pub overtime_normal: Decimal,
    pub overtime_night: Decimal,
}

/// Employee attributes that feed the allowance table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmployeeAttrs {
    pub marital_status: MaritalStatus,
    pub dependents: u32,
    pub disability: bool,
}

/// One itemized line of a payslip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayslipLine {
    #[schema(example = "Base salary")]
    pub concept: String,
    #[schema(value_type = f64, example = 2000.0)]
    pub amount: Decimal,
}

/// The assembled statement. `neto == total_bruto - total_deducciones`
/// holds exactly, both raw and after `rounded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayslipResult {
    pub earnings: Vec<PayslipLine>,
    pub deductions: Vec<PayslipLine>,
    #[schema(value_type = f64)]
    pub total_bruto: Decimal,
    #[schema(value_type = f64)]
    pub total_deducciones: Decimal,
    #[schema(value_type = f64)]
    pub neto: Decimal,
    #[schema(value_type = f64)]
    pub contribution_base: Decimal,
    #[schema(value_type = f64)]
    pub effective_rate: Decimal,
}

impl PayslipResult {
    /// Display/persistence form: every line at two decimals (half away
    /// from zero), totals recomputed from the rounded lines so the
    /// gross - deductions = net identity survives rounding.
    pub fn rounded(&self) -> PayslipResult {
        fn cents(value: Decimal) -> Decimal {
            value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }

        let earnings: Vec<PayslipLine> = self
            .earnings
            .iter()
            .map(|line| PayslipLine { concept: line.concept.clone(), amount: cents(line.amount) })
            .collect();
        let deductions: Vec<PayslipLine> = self
            .deductions
            .iter()
            .map(|line| PayslipLine { concept: line.concept.clone(), amount: cents(line.amount) })
            .collect();

        let total_bruto: Decimal = earnings.iter().map(|l| l.amount).sum();
        let total_deducciones: Decimal = deductions.iter().map(|l| l.amount).sum();

        PayslipResult {
            earnings,
            deductions,
            total_bruto,
            total_deducciones,
            neto: total_bruto - total_deducciones,
            contribution_base: cents(self.contribution_base),
            effective_rate: self
                .effective_rate
                .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}

/// Computes one employee's payslip for one period.
///
/// Fails atomically: any validation or configuration problem aborts the
/// whole run, never returning a partial statement.
pub fn compute_payroll(
    contract: &ContractTerms,
    supplements: &[Supplement],
    hours: &HoursWorked,
    attrs: &EmployeeAttrs,
    tables: &RateTables,
) -> PayrollResult<PayslipResult> {
    tables.validate()?;

    let earned = aggregate_components(contract.base_monthly, hours, supplements, tables)?;

    let proration = bonus_proration(
        contract.base_monthly,
        earned.supplements_total,
        contract.annual_payments,
    )?;
    let contribution_base = earned.gross + proration;

    let social = social_security_deductions(contribution_base, &tables.social_security)?;
    let withheld = monthly_withholding(contribution_base, social.total, attrs, tables)?;

    let mut earnings_lines = vec![PayslipLine {
        concept: "Base salary".into(),
        amount: earned.base_proportional,
    }];
    if !earned.overtime_normal_pay.is_zero() {
        earnings_lines.push(PayslipLine {
            concept: "Overtime".into(),
            amount: earned.overtime_normal_pay,
        });
    }
    if !earned.overtime_night_pay.is_zero() {
        earnings_lines.push(PayslipLine {
            concept: "Night overtime".into(),
            amount: earned.overtime_night_pay,
        });
    }
    for supplement in supplements {
        earnings_lines.push(PayslipLine {
            concept: supplement.concept.clone(),
            amount: supplement.amount,
        });
    }

    let mut deduction_lines: Vec<PayslipLine> = social
        .items
        .into_iter()
        .map(|(concept, amount)| PayslipLine { concept, amount })
        .collect();
    deduction_lines.push(PayslipLine {
        concept: "Income tax withholding".into(),
        amount: withheld.monthly,
    });

    let total_bruto: Decimal = earnings_lines.iter().map(|l| l.amount).sum();
    let total_deducciones: Decimal = deduction_lines.iter().map(|l| l.amount).sum();

    Ok(PayslipResult {
        earnings: earnings_lines,
        deductions: deduction_lines,
        neto: total_bruto - total_deducciones,
        total_bruto,
        total_deducciones,
        contribution_base,
        effective_rate: withheld.effective_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::error::PayrollError;
    use crate::payroll::tables::test_tables;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn contract_2000x12() -> ContractTerms {
        ContractTerms { base_monthly: dec("2000"), annual_payments: 12 }
    }

    fn single() -> EmployeeAttrs {
        EmployeeAttrs {
            marital_status: MaritalStatus::Single,
            dependents: 0,
            disability: false,
        }
    }

    fn full_month() -> HoursWorked {
        HoursWorked {
            ordinary: Some(dec("160")),
            overtime_normal: Decimal::ZERO,
            overtime_night: Decimal::ZERO,
        }
    }

    #[test]
    fn worked_example_from_the_rate_sheet() {
        // base 2000, 160/160h, no extras, 12 payments, ss 6.5 % total
        let slip = compute_payroll(
            &contract_2000x12(),
            &[],
            &full_month(),
            &single(),
            &test_tables(),
        )
        .unwrap();

        assert_eq!(slip.total_bruto, dec("2000"));
        assert_eq!(slip.contribution_base, dec("2000"));

        let ss: Decimal = slip
            .deductions
            .iter()
            .filter(|l| l.concept != "Income tax withholding")
            .map(|l| l.amount)
            .sum();
        assert_eq!(ss, dec("130.00"));
    }

    #[test]
    fn fourteen_payments_raise_the_contribution_base() {
        let contract = ContractTerms { base_monthly: dec("2000"), annual_payments: 14 };
        let slip =
            compute_payroll(&contract, &[], &full_month(), &single(), &test_tables()).unwrap();

        assert_eq!(slip.total_bruto, dec("2000"));
        assert_eq!(slip.contribution_base.round_dp(2), dec("2333.33"));
    }

    #[test]
    fn net_is_exactly_gross_minus_deductions() {
        let supplements = vec![
            Supplement { concept: "Transport".into(), amount: dec("90.55") },
            Supplement { concept: "Seniority".into(), amount: dec("133.33") },
        ];
        let hours = HoursWorked {
            ordinary: Some(dec("152")),
            overtime_normal: dec("7.5"),
            overtime_night: dec("2"),
        };
        let contract = ContractTerms { base_monthly: dec("2147.89"), annual_payments: 14 };

        let slip =
            compute_payroll(&contract, &supplements, &hours, &single(), &test_tables()).unwrap();
        assert_eq!(slip.neto, slip.total_bruto - slip.total_deducciones);

        let rounded = slip.rounded();
        assert_eq!(
            rounded.neto,
            rounded.total_bruto - rounded.total_deducciones
        );
    }

    #[test]
    fn rounded_totals_are_sums_of_rounded_lines() {
        let contract = ContractTerms { base_monthly: dec("1234.56"), annual_payments: 14 };
        let slip =
            compute_payroll(&contract, &[], &full_month(), &single(), &test_tables()).unwrap();

        let rounded = slip.rounded();
        let earnings_sum: Decimal = rounded.earnings.iter().map(|l| l.amount).sum();
        let deductions_sum: Decimal = rounded.deductions.iter().map(|l| l.amount).sum();
        assert_eq!(rounded.total_bruto, earnings_sum);
        assert_eq!(rounded.total_deducciones, deductions_sum);
    }

    #[test]
    fn identical_inputs_identical_outputs() {
        let supplements =
            vec![Supplement { concept: "Transport".into(), amount: dec("100") }];
        let hours = HoursWorked {
            ordinary: Some(dec("160")),
            overtime_normal: dec("4"),
            overtime_night: Decimal::ZERO,
        };
        let attrs = EmployeeAttrs {
            marital_status: MaritalStatus::MarriedSoleEarner,
            dependents: 3,
            disability: false,
        };
        let contract = ContractTerms { base_monthly: dec("2600"), annual_payments: 14 };

        let first =
            compute_payroll(&contract, &supplements, &hours, &attrs, &test_tables()).unwrap();
        let second =
            compute_payroll(&contract, &supplements, &hours, &attrs, &test_tables()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_salary_produces_zero_slip_without_errors() {
        let contract = ContractTerms { base_monthly: Decimal::ZERO, annual_payments: 12 };
        let slip =
            compute_payroll(&contract, &[], &full_month(), &single(), &test_tables()).unwrap();

        assert_eq!(slip.total_bruto, Decimal::ZERO);
        assert_eq!(slip.neto, Decimal::ZERO);
        assert_eq!(slip.effective_rate, Decimal::ZERO);
    }

    #[test]
    fn overtime_and_supplements_appear_as_lines() {
        let supplements =
            vec![Supplement { concept: "Transport".into(), amount: dec("95") }];
        let hours = HoursWorked {
            ordinary: Some(dec("160")),
            overtime_normal: dec("8"),
            overtime_night: dec("2"),
        };
        let slip = compute_payroll(
            &contract_2000x12(),
            &supplements,
            &hours,
            &single(),
            &test_tables(),
        )
        .unwrap();

        let concepts: Vec<&str> = slip.earnings.iter().map(|l| l.concept.as_str()).collect();
        assert_eq!(
            concepts,
            vec!["Base salary", "Overtime", "Night overtime", "Transport"]
        );
        assert!(
            slip.deductions
                .iter()
                .any(|l| l.concept == "Income tax withholding")
        );
    }

    #[test]
    fn broken_tables_fail_before_any_arithmetic() {
        let mut tables = test_tables();
        tables.brackets.clear();
        assert!(matches!(
            compute_payroll(&contract_2000x12(), &[], &full_month(), &single(), &tables),
            Err(PayrollError::Configuration(_))
        ));
    }

    #[test]
    fn validation_failures_return_no_partial_result() {
        let contract = ContractTerms { base_monthly: dec("2000"), annual_payments: 11 };
        assert!(matches!(
            compute_payroll(&contract, &[], &full_month(), &single(), &test_tables()),
            Err(PayrollError::Validation(_))
        ));
    }
}
