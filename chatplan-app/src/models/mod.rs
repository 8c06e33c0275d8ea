//! Data models for chatplan

pub mod exclude_hint;
pub mod place;
pub mod session;

pub use exclude_hint::ExcludeHint;
pub use place::{Coordinates, ResolvedPlace};
pub use session::{InvalidTransition, Notice, NoticeLevel, Page, SessionRecord};
