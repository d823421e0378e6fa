pub mod hub;
pub mod interface;
pub mod mock;

pub use hub::SensorHub;
pub use interface::{CaptureDevice, Permission, SensorError, SensorKind, SensorStatus};
pub use mock::MockCaptureDevice;
