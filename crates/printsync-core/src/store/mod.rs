// ── Reactive directory store ──
//
// Ordered entity storage with push-based change notification.

mod collection;
mod directory;

pub use directory::Directory;
