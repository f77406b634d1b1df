/// Derives a file-name-safe identifier from a package name.
///
/// Every `-` becomes `_`. A scoped name also loses its leading `@` and has its first `/` replaced by
/// `__`, so `@foo/bar-baz` becomes `foo__bar_baz`.
pub fn module_name_to_identifier(module_name: &str) -> String {
  let ident = module_name.replace('-', "_");
  match ident.strip_prefix('@') {
    Some(unscoped) if unscoped.contains('/') => unscoped.replacen('/', "__", 1),
    _ => ident,
  }
}
