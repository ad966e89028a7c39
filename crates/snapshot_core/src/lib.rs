//! Snapshot core: pure run state machine and output path mapping.
mod effect;
mod msg;
mod output_path;
mod state;
mod update;

pub use effect::{Effect, RunOutcome};
pub use msg::Msg;
pub use output_path::{
    map_to_output_path, route_of, seed_paths, server_root, DEFAULT_PORT, FALLBACK_OUTPUT_PATH,
    FALLBACK_ROUTE, OUTPUT_DIR,
};
pub use state::{Phase, RunState};
pub use update::update;
