//! Linux input backend: evdev capture, uinput emulation, `arboard` clipboard.

pub mod driver;
pub mod keymap;

pub use driver::LinuxInputDriver;
