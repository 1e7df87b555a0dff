use anyhow::{bail, Result};
use tracing::{error, info, warn};

use std::{
    io::{BufRead, Write},
    path::Path,
};

use crate::{bill::Bill, catalog::Catalog};

/// Typing this instead of an item code ends the bill.
pub const DONE: &str = "done";

/// An operator's checkout session at the till.
///
/// The session prompts on `output` and reads one reply per line from
/// `input`, so it runs equally well against the console or an in-memory
/// script.
pub struct Session<'a, R, W> {
    catalog: &'a Catalog,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(catalog: &'a Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    /// Takes the operator through one bill, then saves its receipt to
    /// `receipt`.
    ///
    /// The operator is asked for the cashier and customer names, then for
    /// item codes until they type [`DONE`]. For each known code, they're
    /// asked for a quantity and a discount percentage. Unknown codes are
    /// reported and otherwise ignored, as are purchases too large for the
    /// bill's totals.
    ///
    /// A failure to save the receipt is logged as an error, not returned; the
    /// finished bill is returned either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the input ends while a reply is expected, or if
    /// reading input or writing prompts fails.
    pub fn run(&mut self, receipt: impl AsRef<Path>) -> Result<Bill> {
        let catalog = self.catalog;
        let cashier = self.ask("Enter cashier name:")?;
        let customer = self.ask("Enter customer name (or press enter if not registered):")?;
        let mut bill = Bill::new(cashier, customer);
        info!(cashier = bill.cashier(), customer = bill.customer(), "bill started");

        loop {
            let code = self.ask("Enter item code (or type 'done' to finish):")?;
            if code.trim().eq_ignore_ascii_case(DONE) {
                break;
            }
            let Some(item) = catalog.get(&code) else {
                writeln!(self.output, "Invalid code!")?;
                continue;
            };
            let quantity = self.ask_number("Enter Quantity:")?;
            let discount = self.ask_number("Enter Discount (%):")?;
            if let Err(err) = bill.add_item(item, quantity, discount) {
                warn!("{err:#}");
                writeln!(self.output, "Amount too large!")?;
                continue;
            }
            info!(code = %item.code, quantity, discount, "item added");
        }

        let receipt = receipt.as_ref();
        match bill.save_receipt(receipt) {
            Ok(()) => writeln!(self.output, "Bill saved as {}", receipt.display())?,
            Err(err) => error!(path = %receipt.display(), "error saving bill: {err:#}"),
        }
        Ok(bill)
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut reply = String::new();
        if self.input.read_line(&mut reply)? == 0 {
            bail!("unexpected end of input after {prompt:?}");
        }
        Ok(reply.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_number(&mut self, prompt: &str) -> Result<i32> {
        loop {
            let reply = self.ask(prompt)?;
            match reply.trim().parse() {
                Ok(n) => return Ok(n),
                Err(_) => writeln!(self.output, "Invalid number!")?,
            }
        }
    }
}
