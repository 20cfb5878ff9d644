pub mod slab;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::errors::{DepositError, Result};

pub use slab::{AmountRange, PeriodRange, RateSlab};

/// which slab dimensions a chart keys on, primary key first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    PeriodOnly,
    AmountOnly,
    /// narrow by period, then by amount
    PeriodThenAmount,
    /// narrow by amount, then by period
    AmountThenPeriod,
}

impl ChartKind {
    fn uses_period(&self) -> bool {
        !matches!(self, ChartKind::AmountOnly)
    }

    fn uses_amount(&self) -> bool {
        !matches!(self, ChartKind::PeriodOnly)
    }
}

/// Tiered rate table shared by every account opened under a product.
///
/// Construction rejects slabs that overlap on the chart's active dimensions,
/// so any (amount, period) pair resolves to at most one slab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChartDefinition")]
pub struct InterestRateChart {
    name: String,
    valid_from: NaiveDate,
    valid_to: Option<NaiveDate>,
    kind: ChartKind,
    slabs: Vec<RateSlab>,
}

/// unvalidated chart as it arrives from configuration
#[derive(Debug, Clone, Deserialize)]
struct ChartDefinition {
    name: String,
    valid_from: NaiveDate,
    #[serde(default)]
    valid_to: Option<NaiveDate>,
    kind: ChartKind,
    slabs: Vec<RateSlab>,
}

impl TryFrom<ChartDefinition> for InterestRateChart {
    type Error = DepositError;

    fn try_from(def: ChartDefinition) -> Result<Self> {
        InterestRateChart::new(def.name, def.kind, def.valid_from, def.valid_to, def.slabs)
    }
}

impl InterestRateChart {
    pub fn new(
        name: impl Into<String>,
        kind: ChartKind,
        valid_from: NaiveDate,
        valid_to: Option<NaiveDate>,
        slabs: Vec<RateSlab>,
    ) -> Result<Self> {
        let chart = Self {
            name: name.into(),
            valid_from,
            valid_to,
            kind,
            slabs,
        };
        chart.validate()?;
        Ok(chart)
    }

    pub fn builder() -> InterestRateChartBuilder {
        InterestRateChartBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn slabs(&self) -> &[RateSlab] {
        &self.slabs
    }

    pub fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    pub fn valid_to(&self) -> Option<NaiveDate> {
        self.valid_to
    }

    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        date >= self.valid_from && self.valid_to.map_or(true, |to| date <= to)
    }

    /// annual rate for a deposit of `amount` held for `period_months`
    pub fn resolve(&self, amount: Money, period_months: u32) -> Result<Rate> {
        let slab = self.resolve_slab(amount, period_months)?;
        debug!(
            chart = %self.name,
            %amount,
            period_months,
            rate = %slab.annual_rate_percent,
            "rate slab resolved"
        );
        Ok(slab.rate())
    }

    pub fn resolve_slab(&self, amount: Money, period_months: u32) -> Result<&RateSlab> {
        let by_period = |slab: &RateSlab| slab.period.is_some_and(|p| p.contains(period_months));
        let by_amount = |slab: &RateSlab| slab.amount.is_some_and(|a| a.contains(amount));

        let (primary, secondary): (&dyn Fn(&RateSlab) -> bool, Option<&dyn Fn(&RateSlab) -> bool>) =
            match self.kind {
                ChartKind::PeriodOnly => (&by_period, None),
                ChartKind::AmountOnly => (&by_amount, None),
                ChartKind::PeriodThenAmount => (&by_period, Some(&by_amount)),
                ChartKind::AmountThenPeriod => (&by_amount, Some(&by_period)),
            };

        let narrowed: Vec<(usize, &RateSlab)> = self
            .slabs
            .iter()
            .enumerate()
            .filter(|(_, slab)| primary(*slab))
            .collect();
        let candidates: Vec<(usize, &RateSlab)> = match secondary {
            Some(matches) => narrowed.into_iter().filter(|(_, slab)| matches(*slab)).collect(),
            None => narrowed,
        };

        match candidates.as_slice() {
            [] => Err(DepositError::NoMatchingSlab {
                amount,
                period_months,
            }),
            [(_, slab)] => Ok(*slab),
            [(first, _), (second, _), ..] => Err(DepositError::AmbiguousSlab {
                first: *first,
                second: *second,
                message: format!("both match amount {} for {} months", amount, period_months),
            }),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.slabs.is_empty() {
            return Err(DepositError::InvalidConfiguration {
                message: format!("chart '{}' has no slabs", self.name),
            });
        }
        if self.valid_to.is_some_and(|to| to < self.valid_from) {
            return Err(DepositError::InvalidConfiguration {
                message: format!("chart '{}' ends before it starts", self.name),
            });
        }

        for (index, slab) in self.slabs.iter().enumerate() {
            slab.validate()?;
            if self.kind.uses_period() != slab.period.is_some() {
                return Err(DepositError::InvalidConfiguration {
                    message: format!(
                        "slab {} of chart '{}' does not match {:?} (period range)",
                        index, self.name, self.kind
                    ),
                });
            }
            if self.kind.uses_amount() != slab.amount.is_some() {
                return Err(DepositError::InvalidConfiguration {
                    message: format!(
                        "slab {} of chart '{}' does not match {:?} (amount range)",
                        index, self.name, self.kind
                    ),
                });
            }
        }

        for (i, a) in self.slabs.iter().enumerate() {
            for (j, b) in self.slabs.iter().enumerate().skip(i + 1) {
                if self.slabs_overlap(a, b) {
                    return Err(DepositError::AmbiguousSlab {
                        first: i,
                        second: j,
                        message: format!("ranges overlap in chart '{}'", self.name),
                    });
                }
            }
        }
        Ok(())
    }

    fn slabs_overlap(&self, a: &RateSlab, b: &RateSlab) -> bool {
        let period_overlap = match (a.period, b.period) {
            (Some(pa), Some(pb)) => pa.overlaps(&pb),
            _ => true,
        };
        let amount_overlap = match (a.amount, b.amount) {
            (Some(aa), Some(ab)) => aa.overlaps(&ab),
            _ => true,
        };
        period_overlap && amount_overlap
    }
}

/// builder for interest rate charts
pub struct InterestRateChartBuilder {
    name: String,
    kind: ChartKind,
    valid_from: NaiveDate,
    valid_to: Option<NaiveDate>,
    slabs: Vec<RateSlab>,
}

impl InterestRateChartBuilder {
    pub fn new() -> Self {
        Self {
            name: "default".to_string(),
            kind: ChartKind::PeriodOnly,
            valid_from: NaiveDate::MIN,
            valid_to: None,
            slabs: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn valid_from(mut self, date: NaiveDate) -> Self {
        self.valid_from = date;
        self
    }

    pub fn valid_to(mut self, date: NaiveDate) -> Self {
        self.valid_to = Some(date);
        self
    }

    pub fn slab(mut self, slab: RateSlab) -> Self {
        self.slabs.push(slab);
        self
    }

    pub fn build(self) -> Result<InterestRateChart> {
        InterestRateChart::new(self.name, self.kind, self.valid_from, self.valid_to, self.slabs)
    }
}

impl Default for InterestRateChartBuilder {
    fn default() -> Self {
        Self::new()
    }
}
