//! Static product catalog: product name → unit price. Used only to pre-fill
//! new stock lines and to seed an empty inventory.

use rust_decimal::Decimal;

/// Products in declaration order; that order is the inventory seed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    prices: Vec<(String, Decimal)>,
}

const BUILTIN: &[(&str, i64)] = &[
    ("Tydineal Cream", 700),
    ("Tydisil Cream", 945),
    ("Anofast Gel", 700),
    ("Tydiclear Cream", 515),
    ("Tydibact Cream", 580),
    ("Borocare Cream", 1520),
    ("Klaract Cream", 1565),
    ("Ciprofloxacin Tablet", 400),
    ("Metformin Tablet", 800),
    ("Vitamin C Syrup", 300),
    ("Gentamicin Inj", 5995),
    ("Diclofenac Inj", 4550),
    ("Artemether Inj", 4350),
    ("M&B Isopropyl Alcohol", 950),
];

impl Catalog {
    pub fn builtin() -> Self {
        BUILTIN
            .iter()
            .map(|&(name, price)| (name.to_string(), Decimal::from(price)))
            .collect()
    }

    pub fn price(&self, product: &str) -> Option<Decimal> {
        self.prices
            .iter()
            .find(|(name, _)| name == product)
            .map(|(_, price)| *price)
    }

    pub fn products(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.prices.iter().map(|(n, p)| (n.as_str(), *p))
    }

    /// Product names in alphabetical order, for pickers.
    pub fn sorted(&self) -> Vec<(&str, Decimal)> {
        let mut rows: Vec<_> = self.products().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// A repeated name keeps its first position and takes the last price.
impl FromIterator<(String, Decimal)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        let mut prices: Vec<(String, Decimal)> = Vec::new();
        for (name, price) in iter {
            match prices.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = price,
                None => prices.push((name, price)),
            }
        }
        Self { prices }
    }
}
