//! State module for tracking crawl progress
//!
//! Every top-level crawl walks the same phase sequence:
//!
//! `Idle → Resetting → Classifying → Draining → Retrying → Sorting → Done`
//!
//! `Draining` is the barrier after which no page task writes to the registry,
//! so the retry pass can read the broken link map safely.

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
