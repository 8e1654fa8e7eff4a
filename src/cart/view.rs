//! Cart View

use std::sync::{
    PoisonError, RwLock,
    atomic::{AtomicUsize, Ordering},
};

use rusty_money::iso::{self, Currency};
use tabled::{builder::Builder, settings::Style};

use crate::{cart::CartLineItem, prices::Price};

/// A rendered cart line; `position` is the handle used to remove it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Position of the line item in the cart.
    pub position: usize,

    /// Product display name.
    pub name: String,

    /// Unit price in minor currency units.
    pub unit_price: Price,

    /// Image URL or path.
    pub image_reference: String,
}

/// Displayed cart state: its lines, total and count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSummary {
    lines: Vec<CartLine>,
    total: Price,
    count: usize,
}

impl CartSummary {
    /// Build the summary for a cart.
    #[must_use]
    pub fn from_items(items: &[CartLineItem]) -> Self {
        let lines = items
            .iter()
            .enumerate()
            .map(|(position, item)| CartLine {
                position,
                name: item.name.clone(),
                unit_price: item.unit_price,
                image_reference: item.image_reference.clone(),
            })
            .collect::<Vec<_>>();

        Self {
            total: lines.iter().map(|line| line.unit_price).sum(),
            count: lines.len(),
            lines,
        }
    }

    /// Rendered lines, in cart order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of all unit prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.total
    }

    /// Number of line items.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Render the summary as a text table.
    #[must_use]
    pub fn to_table(&self, currency: &'static Currency) -> String {
        let mut builder = Builder::default();

        builder.push_record(["#", "Item", "Price"]);

        for line in &self.lines {
            builder.push_record([
                line.position.to_string(),
                line.name.clone(),
                line.unit_price.format(currency),
            ]);
        }

        builder.push_record([
            String::new(),
            format!("Total ({} items)", self.count),
            self.total.format(currency),
        ]);

        let mut table = builder.build();

        table.with(Style::modern_rounded());

        table.to_string()
    }
}

/// Holds the most recently rendered cart summary.
///
/// Rendering is a full rebuild from the item sequence; there is no diffing.
#[derive(Debug)]
pub struct CartView {
    currency: &'static Currency,
    current: RwLock<CartSummary>,
    renders: AtomicUsize,
}

impl Default for CartView {
    fn default() -> Self {
        Self::new(iso::INR)
    }
}

impl CartView {
    /// Create an empty view that formats prices in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            current: RwLock::new(CartSummary::default()),
            renders: AtomicUsize::new(0),
        }
    }

    /// Rebuild the displayed state from `items`.
    pub fn render(&self, items: &[CartLineItem]) -> CartSummary {
        let summary = CartSummary::from_items(items);

        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = summary.clone();

        self.renders.fetch_add(1, Ordering::Relaxed);

        summary
    }

    /// The currently displayed state.
    #[must_use]
    pub fn snapshot(&self) -> CartSummary {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of renders performed so far.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    /// Currency used for display.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Displayed total, formatted in the view currency.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        self.snapshot().total().format(self.currency)
    }

    /// Displayed state as a text table.
    #[must_use]
    pub fn to_table(&self) -> String {
        self.snapshot().to_table(self.currency)
    }
}
