#![doc = include_str!("../README.md")]
pub mod bill;
pub mod catalog;
pub mod pending;
pub mod report;
pub mod rupees;
pub mod session;

pub use bill::{Bill, Line};
pub use catalog::{Catalog, Item};
pub use pending::PendingBills;
pub use report::generate_report;
pub use rupees::Rupees;
pub use session::Session;
