mod entry_points;
mod types;

pub use self::entry_points::*;
pub use self::types::*;
