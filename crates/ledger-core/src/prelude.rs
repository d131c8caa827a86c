pub use crate::app::App;
pub use ledger_types::error::{AuthError, ClResult, Error};
pub use ledger_types::types::{Patch, Timestamp};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
