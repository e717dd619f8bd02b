//! HID module - USB raw-HID communication with the macropad

pub mod commands;
pub mod device;
pub mod keycodes;
#[cfg(any(test, feature = "mock-hid"))]
pub mod mock;
pub mod protocol;
pub mod sink;

pub use device::HidDeck;
pub use keycodes::{ConsumerCode, Keycode};
pub use protocol::{Command, HidPacket};
pub use sink::OutputSink;

use crate::core::events::InputSource;
use crate::display::{DisplaySurface, LedPanel};

/// Everything the controller needs from the pad: input polling, the
/// output sink, the LED panel, and the display surface. The production
/// impl is [`HidDeck`]; tests use the mock.
pub trait Device: InputSource + OutputSink + LedPanel + DisplaySurface {}

impl<T: InputSource + OutputSink + LedPanel + DisplaySurface> Device for T {}
