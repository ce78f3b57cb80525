pub mod session;
pub mod views;

pub use session::BillingSession;
pub use views::{BillView, ConfigView};
