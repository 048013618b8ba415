/// Incremental reference search.
///
/// A search is launched once, then advanced one time-boxed slice at a time.
/// Each slice walks the host's result list, navigates to every new reference
/// occurrence and links the entity found there to the searched symbol.
mod launcher;
mod linker;
mod processor;
mod searcher;
mod session;

pub use launcher::{begin_search, launch_search};
pub use linker::link_target;
pub use processor::process_slice;
pub use searcher::ReferenceSearcher;
pub use session::SearchSession;
