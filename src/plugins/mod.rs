pub mod attribution;
pub mod camera;
pub mod controls;
pub mod hud;
pub mod interaction;
pub mod lighting;
pub mod loading;
pub mod scene;
pub mod viewer;
