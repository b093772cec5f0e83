//! Review domain - routing conversations to expert review queues.

mod router;

pub use router::ReviewRouter;
