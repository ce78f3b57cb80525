pub mod bill;
pub mod configuration;

pub use bill::{BillResponse, CalculateBill, FORMULA_TOLERANCE};
pub use configuration::{ConfigUpdate, Configuration};
