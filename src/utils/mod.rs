//! Pure math helpers shared by the viewer: coordinate mapping, the magnitude
//! color ramp, lunar phase and easing curves.

pub mod color;
pub mod easing;
pub mod geo;
pub mod lunar;
