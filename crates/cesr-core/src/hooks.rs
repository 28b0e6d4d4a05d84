//! Consumer-supplied mapping of decoded values.

use serde::Serialize;

use crate::header::{DecodedValue, VersionHeader};
use crate::state::{Frame, Group};

/// Classification of a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Structured-serialization body framed by a version string.
    Serialization,
    /// Counter whose body is reparsed as a nested stream.
    Frame,
    /// Counter announcing grouped repetitions.
    Group,
    Leaf,
}

/// Where a value was decoded. Read-only view of the decoder state.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'s> {
    pub frame: &'s Frame,
    /// Number of open frames, root included.
    pub depth: usize,
    /// Group repetition the value belongs to, if any.
    pub group: Option<&'s Group>,
    /// Last version header seen in the session.
    pub version: Option<&'s VersionHeader>,
}

type Hook<'h, T> = Box<dyn FnMut(&HookContext<'_>, DecodedValue) -> T + 'h>;
type Fallback<'h, T> = Box<dyn FnMut(ValueKind, &HookContext<'_>, DecodedValue) -> T + 'h>;

/// One fallback callback plus optional per-kind overrides.
pub struct MapHooks<'h, T> {
    fallback: Fallback<'h, T>,
    serialization: Option<Hook<'h, T>>,
    frame: Option<Hook<'h, T>>,
    group: Option<Hook<'h, T>>,
    leaf: Option<Hook<'h, T>>,
}

impl<'h, T> MapHooks<'h, T> {
    pub fn new(
        fallback: impl FnMut(ValueKind, &HookContext<'_>, DecodedValue) -> T + 'h,
    ) -> Self {
        Self {
            fallback: Box::new(fallback),
            serialization: None,
            frame: None,
            group: None,
            leaf: None,
        }
    }

    pub fn on_serialization(mut self, hook: impl FnMut(&HookContext<'_>, DecodedValue) -> T + 'h) -> Self {
        self.serialization = Some(Box::new(hook));
        self
    }

    pub fn on_frame(mut self, hook: impl FnMut(&HookContext<'_>, DecodedValue) -> T + 'h) -> Self {
        self.frame = Some(Box::new(hook));
        self
    }

    pub fn on_group(mut self, hook: impl FnMut(&HookContext<'_>, DecodedValue) -> T + 'h) -> Self {
        self.group = Some(Box::new(hook));
        self
    }

    pub fn on_leaf(mut self, hook: impl FnMut(&HookContext<'_>, DecodedValue) -> T + 'h) -> Self {
        self.leaf = Some(Box::new(hook));
        self
    }

    pub(crate) fn map(&mut self, kind: ValueKind, context: &HookContext<'_>, value: DecodedValue) -> T {
        let hook = match kind {
            ValueKind::Serialization => self.serialization.as_mut(),
            ValueKind::Frame => self.frame.as_mut(),
            ValueKind::Group => self.group.as_mut(),
            ValueKind::Leaf => self.leaf.as_mut(),
        };
        match hook {
            Some(hook) => hook(context, value),
            None => (self.fallback)(kind, context, value),
        }
    }
}

impl MapHooks<'static, DecodedValue> {
    /// Yields every value unchanged.
    pub fn passthrough() -> Self {
        MapHooks::new(|_, _, value| value)
    }
}

impl Default for MapHooks<'static, DecodedValue> {
    fn default() -> Self {
        Self::passthrough()
    }
}
