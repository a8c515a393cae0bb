pub use record::*;
pub use timestamp::*;
pub use username::*;

mod record;
mod timestamp;
mod username;
