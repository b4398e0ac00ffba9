use super::entry::{Entry, EntryId, ToastData};

const DEFAULT_AUTOHIDE: bool = true;

/// Merge producer data with the per-entry defaults.
///
/// Explicit fields always win. Queue-level settings such as position and
/// autohide delay stay on the queue and are not copied onto the entry.
#[must_use]
pub fn resolve(id: EntryId, data: ToastData) -> Entry {
    let ToastData {
        title,
        body,
        autohide,
        variant,
    } = data;
    Entry::new(
        id,
        title,
        body,
        autohide.unwrap_or(DEFAULT_AUTOHIDE),
        variant,
    )
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::queue::{EntryId, ToastData};

    #[test]
    fn autohide_defaults_to_true() {
        let entry = resolve(EntryId::new(1), ToastData::new("A", "a"));
        assert!(entry.autohide());
        assert!(entry.is_visible());
        assert_eq!(entry.variant(), None);
    }

    #[test]
    fn explicit_autohide_false_is_preserved() {
        let entry = resolve(EntryId::new(1), ToastData::new("A", "a").autohide(false));
        assert!(!entry.autohide());
    }

    #[test]
    fn variant_is_forwarded_verbatim() {
        let entry = resolve(EntryId::new(3), ToastData::new("A", "a").variant("Secondary "));
        assert_eq!(entry.variant(), Some("Secondary "));
        assert_eq!(entry.id(), EntryId::new(3));
    }
}
