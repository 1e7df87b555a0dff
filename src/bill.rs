use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDateTime};

use std::{
    collections::BTreeMap,
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::Arc,
};

use crate::{catalog::Item, rupees::Rupees};

const HEADER: &str = "Super-Saving Supermarket -Kegalle Branch- Bill";
const RULE: &str = "--------------------------------------------------";

/// The purchases for one customer transaction.
///
/// To create a new, empty `Bill`, use [`Bill::new`].
///
/// To add purchases, use [`Bill::add_item`].
///
/// To get the printable receipt, use its [`Display`] implementation, or write
/// it straight to a file with [`Bill::save_receipt`].
///
/// # Examples
///
/// ```
/// # use std::str::FromStr;
/// # use chrono::NaiveDate;
/// # use supersaver::{Bill, Catalog, Item, Rupees};
/// let mut catalog = Catalog::new();
/// catalog.insert(Item {
///     code: "A1".into(),
///     name: "Rice 1kg".into(),
///     price: Rupees::from_str("150.00").unwrap(),
///     weight: 1.0,
///     manufacturer: "ACME".into(),
///     manufactured: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     expiry: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
/// });
/// let mut bill = Bill::new("Nimal", "");
/// bill.add_item(catalog.get("a1").unwrap(), 2, 10).unwrap();
/// assert_eq!(bill.total_cost().to_string(), "270.00");
/// assert_eq!(bill.total_discount().to_string(), "30.00");
/// ```
#[derive(Debug, Clone)]
pub struct Bill {
    cashier: String,
    customer: String,
    created: NaiveDateTime,
    lines: BTreeMap<String, Line>,
    total_cost: Rupees,
    total_discount: Rupees,
}

/// One distinct item on a bill, with the quantity bought across all
/// [`Bill::add_item`] calls for it.
#[derive(Debug, Clone)]
pub struct Line {
    pub item: Arc<Item>,
    pub quantity: i64,
}

impl Line {
    /// Returns the unit price times the quantity, before any discount.
    #[must_use]
    pub fn total(&self) -> Rupees {
        self.item.price * self.quantity
    }
}

impl Bill {
    /// Creates an empty bill stamped with the current local time.
    #[must_use]
    pub fn new(cashier: impl Into<String>, customer: impl Into<String>) -> Self {
        Self::at(cashier, customer, Local::now().naive_local())
    }

    /// Creates an empty bill stamped with `created`.
    #[must_use]
    pub fn at(
        cashier: impl Into<String>,
        customer: impl Into<String>,
        created: NaiveDateTime,
    ) -> Self {
        Self {
            cashier: cashier.into(),
            customer: customer.into(),
            created,
            lines: BTreeMap::new(),
            total_cost: Rupees::ZERO,
            total_discount: Rupees::ZERO,
        }
    }

    /// Adds `quantity` of `item`, less `discount_percent` percent.
    ///
    /// The discount applies only to the quantity added by this call. If the
    /// item is already on the bill, its quantity goes up rather than a second
    /// line being added.
    ///
    /// Neither argument is range-checked: a negative discount or one over 100
    /// is applied just as given.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the bill unchanged, if a running total or
    /// the item's quantity would overflow.
    pub fn add_item(
        &mut self,
        item: &Arc<Item>,
        quantity: i32,
        discount_percent: i32,
    ) -> Result<()> {
        let overflow = || anyhow!("adding {quantity} of {}: amount out of range", item.code);
        let line_total = item.price * i64::from(quantity);
        let discount = line_total
            .checked_percent(discount_percent)
            .ok_or_else(overflow)?;
        let total_cost = line_total
            .checked_sub(discount)
            .and_then(|net| self.total_cost.checked_add(net))
            .ok_or_else(overflow)?;
        let total_discount = self
            .total_discount
            .checked_add(discount)
            .ok_or_else(overflow)?;
        let key = item.code.to_lowercase();
        let held = self.lines.get(&key).map_or(0, |l| l.quantity);
        let held = held.checked_add(i64::from(quantity)).ok_or_else(overflow)?;

        self.total_cost = total_cost;
        self.total_discount = total_discount;
        self.lines
            .entry(key)
            .or_insert_with(|| Line {
                item: Arc::clone(item),
                quantity: 0,
            })
            .quantity = held;
        Ok(())
    }

    /// Writes the receipt to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns any errors from creating or writing the file.
    pub fn save_receipt(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        );
        write!(file, "{self}").with_context(|| format!("writing {}", path.display()))?;
        file.flush()
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    #[must_use]
    pub fn cashier(&self) -> &str {
        &self.cashier
    }

    #[must_use]
    pub fn customer(&self) -> &str {
        &self.customer
    }

    #[must_use]
    pub fn created(&self) -> NaiveDateTime {
        self.created
    }

    /// Returns the bill's lines, ordered by item code.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    /// Returns the total quantity of the item with `code` (ignoring case), if
    /// it is on the bill.
    #[must_use]
    pub fn quantity_of(&self, code: &str) -> Option<i64> {
        self.lines.get(&code.to_lowercase()).map(|l| l.quantity)
    }

    /// Returns the amount payable, after discounts.
    #[must_use]
    pub fn total_cost(&self) -> Rupees {
        self.total_cost
    }

    #[must_use]
    pub fn total_discount(&self) -> Rupees {
        self.total_discount
    }
}

// The per-line "Total Price" column is the undiscounted extended price;
// only the footer totals reflect discounts.
impl Display for Bill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{HEADER}")?;
        writeln!(f, "Cashier: {}", self.cashier)?;
        writeln!(f, "Customer: {}", self.customer)?;
        writeln!(f, "Date: {}", self.created.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Qty  Item Name                Unit Price  Total Price")?;
        writeln!(f, "{RULE}")?;
        for line in self.lines.values() {
            writeln!(
                f,
                "{:<4} {:<20} Rs. {:<10} Rs. {}",
                line.quantity,
                line.item.name,
                line.item.price,
                line.total()
            )?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total Discount: Rs. {}", self.total_discount)?;
        writeln!(f, "Total Cost: Rs. {}", self.total_cost)?;
        Ok(())
    }
}
