//! Locale-style ordering of symbol names, so extern files stay stable when declarations move
//! around inside a library.

use icu_collator::Collator;
use icu_collator::CollatorOptions;
use std::cmp::Ordering;
use tracing::warn;

thread_local! {
  /// Root locale collation at tertiary strength.
  static ROOT_COLLATOR: Option<Collator> =
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
      Ok(collator) => Some(collator),
      Err(err) => {
        warn!(%err, "root collation unavailable, ordering names by code point");
        None
      }
    };
}

/// Compares two names with the root locale's collation: base letters first (so `é` sorts next to
/// `e` and `ß` next to `ss`), then accents, then lowercase before uppercase. Names the collation
/// considers equal are ordered by code point.
pub fn collate(a: &str, b: &str) -> Ordering {
  ROOT_COLLATOR
    .with(|collator| match collator {
      Some(collator) => collator.compare(a, b),
      None => Ordering::Equal,
    })
    .then_with(|| a.cmp(b))
}
