//! Frame and group stacks of a decode session.

use std::fmt;
use std::sync::Arc;

use crate::error::CesrError;
use crate::registry::Registry;

/// How values at the top level of a frame are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameMode {
    /// Sniff each value's cold start (the whole input).
    ColdStart,
    /// Body of a coded container; every value is derivation-coded.
    Coded,
}

/// One pending repetition of grouped content.
#[derive(Clone)]
pub struct Group {
    /// Selector of the counter that opened the group.
    pub selector: String,
    /// Repetitions announced by the counter.
    pub count: usize,
    /// Registry applied to grouped values, if not the session's base registry.
    pub context: Option<Arc<dyn Registry>>,
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("selector", &self.selector)
            .field("count", &self.count)
            .field("context", &self.context.as_ref().map(|registry| registry.name()))
            .finish()
    }
}

#[derive(Clone)]
pub struct Frame {
    /// Exclusive end offset of the frame's extent.
    pub end: usize,
    pub mode: FrameMode,
    /// Registry of the group that opened this frame; applies to its whole body.
    pub context: Option<Arc<dyn Registry>>,
    /// Pending groups, innermost last, each with its remaining repetitions.
    groups: Vec<(Group, usize)>,
}

impl Frame {
    fn new(end: usize, mode: FrameMode, context: Option<Arc<dyn Registry>>) -> Self {
        Self {
            end,
            mode,
            context,
            groups: Vec::new(),
        }
    }

    /// Group repetitions not yet consumed in this frame.
    pub fn pending_groups(&self) -> usize {
        self.groups.iter().map(|(_, remaining)| remaining).sum()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("end", &self.end)
            .field("mode", &self.mode)
            .field("context", &self.context.as_ref().map(|registry| registry.name()))
            .field("groups", &self.groups)
            .finish()
    }
}

/// Frame stack plus the shared read cursor.
///
/// The root frame lives outside the nested stack so it can never be popped.
#[derive(Debug, Clone)]
pub struct DecoderState {
    root: Frame,
    nested: Vec<Frame>,
    cursor: usize,
}

impl DecoderState {
    pub fn new(len: usize) -> Self {
        Self {
            root: Frame::new(len, FrameMode::ColdStart, None),
            nested: Vec::new(),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of frames including the root.
    pub fn depth(&self) -> usize {
        self.nested.len() + 1
    }

    /// The active (innermost) frame.
    pub fn frame(&self) -> &Frame {
        self.nested.last().unwrap_or(&self.root)
    }

    fn frame_mut(&mut self) -> &mut Frame {
        self.nested.last_mut().unwrap_or(&mut self.root)
    }

    /// Frames from the root outwards.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        std::iter::once(&self.root).chain(self.nested.iter())
    }

    pub fn push_frame(&mut self, end: usize, context: Option<Arc<dyn Registry>>) {
        self.nested.push(Frame::new(end, FrameMode::Coded, context));
    }

    pub fn pop_frame(&mut self) -> Result<Frame, CesrError> {
        self.nested.pop().ok_or(CesrError::FrameUnderflow)
    }

    /// Opens `group.count` repetitions of `group` on the active frame.
    ///
    /// Repetitions are counted, not materialised, so the announced count
    /// costs nothing until values are actually read.
    pub fn push_group(&mut self, group: Group) {
        let count = group.count;
        if count > 0 {
            self.frame_mut().groups.push((group, count));
        }
    }

    /// Consumes one repetition of the innermost pending group.
    pub fn pop_group(&mut self) -> Option<Group> {
        let groups = &mut self.frame_mut().groups;
        let last = groups.last_mut()?;
        last.1 -= 1;
        if last.1 == 0 {
            groups.pop().map(|(group, _)| group)
        } else {
            Some(last.0.clone())
        }
    }

    /// Moves the cursor forward, never past the active frame's end.
    pub fn advance(&mut self, length: usize) -> Result<(), CesrError> {
        let end = self.frame().end;
        let next = self.cursor + length;
        if next > end {
            return Err(CesrError::shortage(end - self.cursor, length));
        }
        self.cursor = next;
        Ok(())
    }

    /// Only the root remains and it has no pending groups.
    pub fn is_balanced(&self) -> bool {
        self.nested.is_empty() && self.root.groups.is_empty()
    }
}
