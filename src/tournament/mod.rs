/// Applies parsed commands to a community and enforces the tournament rules.
pub mod engine;
/// Communities, tournaments, participants and teams.
pub mod models;
/// Per-guild state and tournament name resolution.
pub mod registry;
/// The read-only status report and its rendering.
pub mod report;

pub use engine::Outcome;
pub use registry::SessionRegistry;
pub use report::UserDirectory;
