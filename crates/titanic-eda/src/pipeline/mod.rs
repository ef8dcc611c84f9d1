//! Session orchestration.
//!
//! [`EdaSession`] runs the stages in [`EdaStage::SEQUENCE`] order and logs
//! each one as it starts.

mod session;
mod stage;

pub use session::EdaSession;
pub use stage::EdaStage;
