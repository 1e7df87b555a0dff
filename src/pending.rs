use tracing::debug;

use std::collections::HashMap;

use crate::bill::Bill;

/// Bills set aside under an identifier, to be picked up again later.
///
/// The store is an ordinary value owned by whoever needs it. To share one
/// between threads, wrap it in a `Mutex`.
#[derive(Debug, Default)]
pub struct PendingBills {
    bills: HashMap<String, Bill>,
}

impl PendingBills {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks `bill` under `id`, replacing any bill already saved there.
    pub fn save(&mut self, id: impl Into<String>, bill: Bill) {
        let id = id.into();
        debug!(%id, "bill parked");
        self.bills.insert(id, bill);
    }

    /// Removes and returns the bill saved under `id`, or `None` if there
    /// isn't one.
    pub fn retrieve(&mut self, id: &str) -> Option<Bill> {
        let bill = self.bills.remove(id);
        debug!(%id, found = bill.is_some(), "bill retrieved");
        bill
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn retrieve_fn_returns_saved_bill_once() {
        let catalog = Catalog::load("testdata/items.csv");
        let mut bill = Bill::new("Nimal", "Kamala");
        bill.add_item(catalog.get("A1").unwrap(), 2, 10).unwrap();
        let mut pending = PendingBills::new();
        pending.save("counter-1", bill);
        assert_eq!(pending.len(), 1);

        let bill = pending.retrieve("counter-1").unwrap();
        assert_eq!(bill.customer(), "Kamala");
        assert_eq!(bill.quantity_of("a1"), Some(2));
        assert!(pending.retrieve("counter-1").is_none());
        assert!(pending.is_empty());
    }

    #[test]
    fn retrieve_fn_returns_none_for_unknown_id() {
        let mut pending = PendingBills::new();
        assert!(pending.retrieve("nope").is_none());
    }

    #[test]
    fn save_fn_overwrites_existing_id() {
        let mut pending = PendingBills::new();
        pending.save("x", Bill::new("Nimal", "first"));
        pending.save("x", Bill::new("Nimal", "second"));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.retrieve("x").unwrap().customer(), "second");
    }
}
