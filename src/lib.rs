pub mod catalog;
pub mod config;
pub mod desktop; // Expose for tests (MemoryClipboard, RecordingNotifier)
pub mod job;
pub mod observability;
pub mod target;
pub mod transport;
