mod client;
mod envelope;
mod requests;

pub use client::{AstroClient, DEFAULT_ITEM_QTY};
pub use envelope::{unwrap_envelope, SUCCESS_STATUS};
pub use requests::{BatchTransaction, CustomerAttributes};
