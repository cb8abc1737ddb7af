pub mod clock;
pub mod currency;
pub mod id_generator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use currency::format_kwanza;
pub use id_generator::{IdGenerator, IdType};
