pub mod record;
pub mod scenario;

pub use record::*;
pub use scenario::*;
