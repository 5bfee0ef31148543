//! Layout and synchronization engine for the live scoreboard.
//!
//! [`LiveModelSync`] is driven by the controller's notifications and by the display loop's
//! timer polls; everything it needs from the display goes through [`DisplaySurface`] and
//! [`TeamRowHandle`].

pub mod auto_open;
pub mod compact;
pub mod header;
pub mod row;
pub mod save_mode;
pub mod selection;
pub mod service_window;
pub mod sync;
pub mod timer;
pub mod viewport;

#[cfg(test)]
mod test_support;

pub use row::TeamRowHandle;
pub use selection::TeamSelection;
pub use service_window::ServiceWindow;
pub use sync::LiveModelSync;
pub use viewport::{DisplaySurface, RenderEnvironment, ScaleContainer, ScaleStrategy, ScaleStyle};
