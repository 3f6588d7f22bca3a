pub mod axes;
pub mod markers;
#[cfg(not(target_arch = "wasm32"))]
mod quit;
pub mod stepper;

pub use axes::*;
pub use markers::*;
#[cfg(not(target_arch = "wasm32"))]
pub use quit::*;
pub use stepper::*;
