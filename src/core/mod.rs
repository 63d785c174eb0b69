pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DecayConfig, EngineConfig};
pub use error::{PetError, Result};
pub use types::{PetId, PetType, PlayerId, SessionId, Timestamp};
