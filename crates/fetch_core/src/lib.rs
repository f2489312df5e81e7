//! Fetch core: pure snapshot reducer, status classifier and observer state machine.
mod action;
mod classify;
mod config;
mod effect;
mod msg;
mod reduce;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use action::Action;
pub use classify::{
    classify, classify_or, DEFAULT_FALLBACK_MESSAGE, STATUS_MESSAGES, TRANSPORT_FALLBACK_STATUS,
};
pub use config::ObserverConfig;
pub use effect::Effect;
pub use msg::{CycleOutcome, Msg};
pub use reduce::reduce;
pub use snapshot::RequestSnapshot;
pub use state::{CycleId, ObserverState, RequestKey};
pub use update::update;
pub use view_model::FetchPhase;
