pub mod catalog;
pub mod error;
pub mod prompt;
pub mod schema;
pub mod selection;
pub mod session;
pub mod stats;
pub mod table;
pub mod viewer;

pub use catalog::CityCatalog;
pub use error::{BikeshareError, Result};
pub use selection::{City, Day, FilterSelection, Month};
pub use session::{Outcome, Session};
pub use table::TripTable;
