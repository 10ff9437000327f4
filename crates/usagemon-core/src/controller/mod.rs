//! Interaction controller: owns the dashboard state and drives the
//! transport.
//!
//! Calls run as spawned tasks; their results come back over a channel and
//! are applied by whoever owns the controller, one at a time:
//!
//! ```ignore
//! let mut controller = InteractionController::new(HttpUsageClient::from_settings(&settings.service)?);
//! controller.start();
//! while let Some(event) = controller.next_completion().await {
//!     println!("{:?} -> {:?}", event, controller.state().status());
//! }
//! ```

mod interaction;
mod state;

pub use interaction::{Completion, ControllerEvent, InteractionController};
pub use state::{ControllerState, OpId, Status};
