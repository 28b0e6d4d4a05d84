//! Lazy stream decoder.
//!
//! [`CesrDecoder`] pulls one value per [`Iterator::next`] call: it frames the
//! next span of the active frame, hands the value to the mapping hooks, and
//! only then updates the frame/group stacks and the cursor. Errors end the
//! iteration.

use std::iter::FusedIterator;
use std::sync::Arc;

use log::{debug, trace};

use crate::error::CesrError;
use crate::header::{DecodedValue, Header, VersionHeader};
use crate::hooks::{HookContext, MapHooks, ValueKind};
use crate::input::Input;
use crate::registry::Registry;
use crate::sniff::{sniff, text_frame};
use crate::state::{DecoderState, FrameMode, Group};

/// State change requested by a decoded value, applied after its hook ran.
enum Transition {
    None,
    PushFrame {
        end: usize,
        context: Option<Arc<dyn Registry>>,
    },
    PushGroup(Group),
}

pub struct CesrDecoder<'a, 'h, T> {
    input: &'a [u8],
    registry: Arc<dyn Registry>,
    hooks: MapHooks<'h, T>,
    state: DecoderState,
    version: Option<VersionHeader>,
    done: bool,
}

impl<'a, 'h, T> CesrDecoder<'a, 'h, T> {
    pub fn new(input: Input<'a>, registry: Arc<dyn Registry>, hooks: MapHooks<'h, T>) -> Self {
        let input = input.as_bytes();
        Self {
            input,
            registry,
            hooks,
            state: DecoderState::new(input.len()),
            version: None,
            done: false,
        }
    }

    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    /// Version header of the most recent serialization body.
    pub fn version(&self) -> Option<&VersionHeader> {
        self.version.as_ref()
    }

    /// Closes exhausted frames. `false` once the root frame is exhausted.
    fn settle(&mut self) -> Result<bool, CesrError> {
        loop {
            let frame = self.state.frame();
            if self.state.cursor() < frame.end {
                return Ok(true);
            }
            let remaining = frame.pending_groups();
            if remaining > 0 {
                return Err(CesrError::UnclosedGroup { remaining });
            }
            if self.state.depth() == 1 {
                return Ok(false);
            }
            let closed = self.state.pop_frame()?;
            debug!("closed frame ending at {}", closed.end);
        }
    }

    fn step(&mut self) -> Result<Option<T>, CesrError> {
        if !self.settle()? {
            return Ok(None);
        }

        let start = self.state.cursor();
        let input = self.input;
        let span = &input[start..self.state.frame().end];
        let group = self.state.pop_group();
        // A group's own context wins over the one its frame was opened under.
        let inherited = group
            .as_ref()
            .and_then(|group| group.context.clone())
            .or_else(|| self.state.frame().context.clone());
        let registry = inherited
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.registry));

        let value = match (&group, self.state.frame().mode) {
            (None, FrameMode::ColdStart) => sniff(registry.as_ref(), span)?,
            _ => text_frame(registry.as_ref(), span)?,
        }
        .shifted(start);

        let (kind, consumed, transition) = match &value.header {
            Header::Version(version) => {
                self.version = Some(version.clone());
                (ValueKind::Serialization, value.length, Transition::None)
            }
            Header::Code(code) if registry.is_frame(code) => (
                ValueKind::Frame,
                code.code_length,
                Transition::PushFrame {
                    end: value.end(),
                    context: inherited.clone(),
                },
            ),
            Header::Code(code) if registry.is_group(code) => {
                let context = if registry.has_context(code) {
                    Some(registry.get_context(code)?)
                } else {
                    inherited.clone()
                };
                let next = Group {
                    selector: code.selector.clone(),
                    count: code.count.unwrap_or_default(),
                    context,
                };
                (ValueKind::Group, code.code_length, Transition::PushGroup(next))
            }
            Header::Code(_) => (ValueKind::Leaf, value.length, Transition::None),
        };
        trace!("{kind:?} at {start}..{} ({} bytes consumed)", value.end(), consumed);

        let context = HookContext {
            frame: self.state.frame(),
            depth: self.state.depth(),
            group: group.as_ref(),
            version: self.version.as_ref(),
        };
        let mapped = self.hooks.map(kind, &context, value);

        self.state.advance(consumed)?;
        match transition {
            Transition::None => {}
            Transition::PushFrame { end, context } => {
                debug!("opened frame {}..{end}", self.state.cursor());
                self.state.push_frame(end, context);
            }
            Transition::PushGroup(next) => {
                debug!("opened group {} x{}", next.selector, next.count);
                self.state.push_group(next);
            }
        }
        Ok(Some(mapped))
    }
}

impl<T> Iterator for CesrDecoder<'_, '_, T> {
    type Item = Result<T, CesrError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(mapped)) => Some(Ok(mapped)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<T> FusedIterator for CesrDecoder<'_, '_, T> {}

/// Decodes `input`, yielding every value unchanged.
pub fn decode<'a>(
    input: impl Into<Input<'a>>,
    registry: Arc<dyn Registry>,
) -> CesrDecoder<'a, 'static, DecodedValue> {
    CesrDecoder::new(input.into(), registry, MapHooks::passthrough())
}

/// Decodes `input`, mapping every value through `hooks`.
pub fn decode_with<'a, 'h, T>(
    input: impl Into<Input<'a>>,
    registry: Arc<dyn Registry>,
    hooks: MapHooks<'h, T>,
) -> CesrDecoder<'a, 'h, T> {
    CesrDecoder::new(input.into(), registry, hooks)
}
