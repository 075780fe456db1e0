use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payroll::MaritalStatus;
use crate::payroll::error::{PayrollError, PayrollResult};

/// A named employee-side social security contribution item, e.g. common
/// contingencies at 0.047. Rates are fractions, not percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionRate {
    pub concept: String,
    pub rate: Decimal,
}

/// One marginal income band. `upper_bound` is exclusive; the last bracket
/// of a table must be open-ended (`None`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

/// Annual personal/family allowances subtracted from the annualized base
/// before bracket application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowanceTable {
    pub single: Decimal,
    pub married_sole_earner: Decimal,
    pub other: Decimal,
    pub first_child: Decimal,
    pub second_child: Decimal,
    /// Applied once per dependent from the third onwards. Explicit table
    /// value; the engine never extrapolates from the second increment.
    pub additional_child: Decimal,
    pub disability: Decimal,
}

impl AllowanceTable {
    pub fn base_allowance(&self, status: MaritalStatus) -> Decimal {
        match status {
            MaritalStatus::Single => self.single,
            MaritalStatus::MarriedSoleEarner => self.married_sole_earner,
            MaritalStatus::Other => self.other,
        }
    }
}

/// The full per-year configuration the engine consumes. Regulatory values
/// change yearly, so none of these are hard-coded in calculation code;
/// they are loaded from a JSON file at startup and injected per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTables {
    pub year: i32,
    pub standard_monthly_hours: Decimal,
    pub overtime_multiplier: Decimal,
    pub night_overtime_multiplier: Decimal,
    pub social_security: Vec<ContributionRate>,
    pub brackets: Vec<TaxBracket>,
    pub allowances: AllowanceTable,
}

impl RateTables {
    /// Structural checks run once at load and again on entry to
    /// `compute_payroll`, so the engine never works from broken tables.
    pub fn validate(&self) -> PayrollResult<()> {
        if self.standard_monthly_hours <= Decimal::ZERO {
            return Err(PayrollError::Configuration(format!(
                "standard_monthly_hours must be positive, got {}",
                self.standard_monthly_hours
            )));
        }
        if self.overtime_multiplier <= Decimal::ZERO
            || self.night_overtime_multiplier <= Decimal::ZERO
        {
            return Err(PayrollError::Configuration(
                "overtime multipliers must be positive".into(),
            ));
        }

        if self.social_security.is_empty() {
            return Err(PayrollError::Configuration(
                "social security rate table is empty".into(),
            ));
        }
        for item in &self.social_security {
            if item.rate < Decimal::ZERO || item.rate > Decimal::ONE {
                return Err(PayrollError::Configuration(format!(
                    "contribution rate '{}' outside [0, 1]: {}",
                    item.concept, item.rate
                )));
            }
        }

        if self.brackets.is_empty() {
            return Err(PayrollError::Configuration("bracket table is empty".into()));
        }
        let mut previous: Option<Decimal> = None;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(PayrollError::Configuration(format!(
                    "bracket rate outside [0, 1]: {}",
                    bracket.rate
                )));
            }
            match bracket.upper_bound {
                Some(upper) => {
                    if i == self.brackets.len() - 1 {
                        return Err(PayrollError::Configuration(
                            "last bracket must be open-ended".into(),
                        ));
                    }
                    if let Some(prev) = previous {
                        if upper <= prev {
                            return Err(PayrollError::Configuration(format!(
                                "bracket bounds not strictly ascending at {}",
                                upper
                            )));
                        }
                    }
                    if upper <= Decimal::ZERO {
                        return Err(PayrollError::Configuration(
                            "bracket bound must be positive".into(),
                        ));
                    }
                    previous = Some(upper);
                }
                None => {
                    if i != self.brackets.len() - 1 {
                        return Err(PayrollError::Configuration(
                            "open-ended bracket before the end of the table".into(),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

/// All yearly tables known to the process, loaded once at boot.
#[derive(Debug, Clone)]
pub struct TableSet {
    tables: Vec<RateTables>,
}

impl TableSet {
    pub fn load(path: impl AsRef<Path>) -> PayrollResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PayrollError::Configuration(format!("cannot read rate tables {}: {}", path.display(), e))
        })?;
        let tables: Vec<RateTables> = serde_json::from_str(&raw).map_err(|e| {
            PayrollError::Configuration(format!("cannot parse rate tables {}: {}", path.display(), e))
        })?;
        Self::from_tables(tables)
    }

    pub fn from_tables(tables: Vec<RateTables>) -> PayrollResult<Self> {
        if tables.is_empty() {
            return Err(PayrollError::Configuration("no rate tables loaded".into()));
        }
        for table in &tables {
            table.validate()?;
        }
        Ok(Self { tables })
    }

    /// No silent fallback: a payroll run for a year without a table fails.
    pub fn for_year(&self, year: i32) -> PayrollResult<&RateTables> {
        self.tables
            .iter()
            .find(|t| t.year == year)
            .ok_or_else(|| PayrollError::Configuration(format!("no rate tables for year {year}")))
    }

    pub fn years(&self) -> Vec<i32> {
        self.tables.iter().map(|t| t.year).collect()
    }
}

/// Shared fixture for the engine's unit tests: the 2025 example tables.
#[cfg(test)]
pub(crate) fn test_tables() -> RateTables {
    use std::str::FromStr;
    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    RateTables {
        year: 2025,
        standard_monthly_hours: dec("160"),
        overtime_multiplier: dec("1.5"),
        night_overtime_multiplier: dec("1.75"),
        social_security: vec![
            ContributionRate { concept: "Common contingencies".into(), rate: dec("0.047") },
            ContributionRate { concept: "Unemployment".into(), rate: dec("0.0155") },
            ContributionRate { concept: "Training".into(), rate: dec("0.001") },
            ContributionRate { concept: "Intergenerational equity".into(), rate: dec("0.0015") },
        ],
        brackets: vec![
            TaxBracket { upper_bound: Some(dec("12450")), rate: dec("0.19") },
            TaxBracket { upper_bound: Some(dec("20200")), rate: dec("0.24") },
            TaxBracket { upper_bound: Some(dec("35200")), rate: dec("0.30") },
            TaxBracket { upper_bound: Some(dec("60000")), rate: dec("0.37") },
            TaxBracket { upper_bound: Some(dec("300000")), rate: dec("0.45") },
            TaxBracket { upper_bound: None, rate: dec("0.47") },
        ],
        allowances: AllowanceTable {
            single: dec("5550"),
            married_sole_earner: dec("8950"),
            other: dec("5550"),
            first_child: dec("2400"),
            second_child: dec("2700"),
            additional_child: dec("4000"),
            disability: dec("3000"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_tables_pass() {
        assert!(test_tables().validate().is_ok());
    }

    #[test]
    fn zero_hour_baseline_is_configuration_error() {
        let mut tables = test_tables();
        tables.standard_monthly_hours = Decimal::ZERO;
        match tables.validate() {
            Err(PayrollError::Configuration(msg)) => {
                assert!(msg.contains("standard_monthly_hours"))
            }
            other => panic!("expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn empty_brackets_rejected() {
        let mut tables = test_tables();
        tables.brackets.clear();
        assert!(matches!(
            tables.validate(),
            Err(PayrollError::Configuration(_))
        ));
    }

    #[test]
    fn empty_rate_table_rejected() {
        let mut tables = test_tables();
        tables.social_security.clear();
        assert!(matches!(
            tables.validate(),
            Err(PayrollError::Configuration(_))
        ));
    }

    #[test]
    fn bounded_last_bracket_rejected() {
        let mut tables = test_tables();
        tables.brackets.pop();
        assert!(matches!(
            tables.validate(),
            Err(PayrollError::Configuration(_))
        ));
    }

    #[test]
    fn descending_bounds_rejected() {
        let mut tables = test_tables();
        tables.brackets.swap(0, 1);
        assert!(matches!(
            tables.validate(),
            Err(PayrollError::Configuration(_))
        ));
    }

    #[test]
    fn table_set_resolves_by_year() {
        let set = TableSet::from_tables(vec![test_tables()]).unwrap();
        assert_eq!(set.for_year(2025).unwrap().year, 2025);
        assert!(matches!(
            set.for_year(1999),
            Err(PayrollError::Configuration(_))
        ));
    }
}
