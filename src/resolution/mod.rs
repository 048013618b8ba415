/// Entity resolution.
///
/// Turns the element found at a reference site into a known entity by
/// matching its name, qualified name, kind and location against a catalog.
mod catalog;

pub use catalog::EntityCatalog;
