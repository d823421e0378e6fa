pub mod console;
pub mod emotion_tts;
pub mod interface;
pub mod recorder;
pub mod unavailable;

pub use console::ConsoleSpeech;
pub use interface::{SpeechOutput, SpeechParams, TtsError};
pub use recorder::RecordingSpeech;
pub use unavailable::UnavailableSpeech;
