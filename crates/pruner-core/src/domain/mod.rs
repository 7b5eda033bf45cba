//! Domain model (IDs, interval, settings, phase, events, outcomes).

pub mod events;
pub mod ids;
pub mod interval;
pub mod outcome;
pub mod settings;
pub mod state;

pub use self::events::PruneEvent;
pub use self::ids::{PassId, PrunerId};
pub use self::interval::{Period, PruneInterval};
pub use self::outcome::TickOutcome;
pub use self::settings::PrunerSettings;
pub use self::state::PrunerPhase;
