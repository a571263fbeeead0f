//! Farm statistics record model and the shared column table.

mod field;
mod record;

pub use field::Field;
pub use record::Record;
