use rust_decimal::Decimal;

/// One row of a progressive tax table.
///
/// The floor of a bracket is the ceiling of the bracket before it (zero for
/// the first bracket), so only the upper bound is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBracket {
    /// Upper bound of the bracket, inclusive. `None` for the unbounded top bracket.
    pub ceiling: Option<Decimal>,
    /// Marginal rate applied to income above the floor, as a fraction.
    pub rate: Decimal,
    /// Cumulative tax owed at the bracket's floor.
    pub base_tax: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        ceiling: Decimal,
        rate: Decimal,
        base_tax: Decimal,
    ) -> Self {
        Self {
            ceiling: Some(ceiling),
            rate,
            base_tax,
        }
    }

    pub fn unbounded(
        rate: Decimal,
        base_tax: Decimal,
    ) -> Self {
        Self {
            ceiling: None,
            rate,
            base_tax,
        }
    }

    /// Whether `income` falls at or below this bracket's ceiling.
    pub fn covers(
        &self,
        income: Decimal,
    ) -> bool {
        self.ceiling.is_none_or(|ceiling| income <= ceiling)
    }
}
