pub mod context;
pub mod conversation;
pub mod emotion;
pub mod engagement;
pub mod orchestrator;
pub mod responder;
pub mod state;
pub mod typing_sim;

pub use context::{ContextTransition, InteractionContext};
pub use conversation::{Message, Sender, Utterance};
pub use emotion::{EmotionChannel, EmotionLabel};
pub use engagement::{EngagementBand, EngagementLevel};
pub use orchestrator::{Companion, CompanionEvent};
pub use state::{CompanionSnapshot, CompanionState};
