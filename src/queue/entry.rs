use std::fmt::{self, Display};

use serde::Serialize;

/// Identifier of an entry, unique for the lifetime of the queue that issued it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<EntryId> for u64 {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

/// What a producer asks for. Unset fields are filled by [`resolve`](fn@super::resolve).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ToastData {
    pub title: String,
    pub body: String,
    pub autohide: Option<bool>,
    pub variant: Option<String>,
}

impl ToastData {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            autohide: None,
            variant: None,
        }
    }

    #[must_use]
    pub fn autohide(mut self, autohide: bool) -> Self {
        self.autohide = Some(autohide);
        self
    }

    /// Style tag forwarded untouched to the renderer (e.g. `"danger"`).
    #[must_use]
    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }
}

/// One notification held by the queue.
///
/// Only `visible` ever changes after creation, and only from `true` to `false`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Entry {
    id: EntryId,
    title: String,
    body: String,
    visible: bool,
    autohide: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant: Option<String>,
}

impl Entry {
    pub(super) fn new(
        id: EntryId,
        title: String,
        body: String,
        autohide: bool,
        variant: Option<String>,
    ) -> Self {
        Self {
            id,
            title,
            body,
            visible: true,
            autohide,
            variant,
        }
    }

    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn autohide(&self) -> bool {
        self.autohide
    }

    #[must_use]
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Copy of this entry with `visible` cleared.
    pub(super) fn hidden(&self) -> Self {
        Self {
            visible: false,
            ..self.clone()
        }
    }
}
