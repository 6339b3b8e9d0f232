/// Resolve the per-file content-line budget for one call.
///
/// An explicit value always wins, including an explicit `0` which forces the
/// full diff even when a default is configured. Otherwise the configured
/// default applies. `None` means no limit.
pub fn resolve_budget(explicit: Option<usize>, configured: Option<usize>) -> Option<usize> {
    match explicit.or(configured) {
        Some(0) | None => None,
        Some(n) => Some(n),
    }
}
