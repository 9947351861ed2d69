pub mod editor;
pub mod input;
pub mod listeners;
pub mod settings;
pub mod target;
