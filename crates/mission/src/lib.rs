//! Mission timers and the pieces of mission data they depend on.

pub mod action;
pub mod conditions;
pub mod data_file;
pub mod data_writer;
pub mod error;
pub mod galaxy;
pub mod location_filter;
pub mod mission;
pub mod player;
pub mod timer;

pub use action::{Action, ConditionEdit, InstantiateContext, MissionAction};
pub use conditions::ConditionStore;
pub use data_file::{DataFile, DataNode};
pub use data_writer::DataWriter;
pub use error::DataError;
pub use galaxy::{Galaxy, StarSystem, StellarObject};
pub use location_filter::LocationFilter;
pub use mission::{Mission, MissionTemplate};
pub use player::{Interface, MessageLog, PlayerInfo, PlayerState};
pub use timer::{
    completion_condition, FailureClass, GateResult, LocationGate, ProximityCenter, ResetCondition,
    ResolvedCenter, TimerInstance, TimerSpec,
};
