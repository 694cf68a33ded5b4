//! Reusable widgets shared by several pages

pub mod avatar_face;
pub mod nav_bar;
pub mod text_block;

pub use avatar_face::AvatarFace;
pub use nav_bar::NavBar;
pub use text_block::{Transcript, TranscriptState};
