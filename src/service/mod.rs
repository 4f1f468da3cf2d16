pub mod dialogue;
pub mod messenger;
