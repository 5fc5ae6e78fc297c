//! Live preview: recompose whenever the compose inputs change.
//!
//! The driver remembers the inputs of the last published preview and skips
//! work when nothing relevant changed (crop drags in progress, metadata
//! edits). Each compose is tagged with a [`PreviewTicket`]; only the newest
//! ticket may publish, so an out-of-order result never replaces a fresher one.

use crate::compose::{compose, ComposeRequest};
use crate::encode::{encode_png, EncodeError};
use crate::session::EditSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PreviewTicket(u64);

/// A published preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub revision: u64,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewUpdate {
    /// Inputs unchanged; the current preview stands
    Unchanged,
    /// A new preview was published
    Updated,
    /// The current inputs cannot be composed and the preview was dropped
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PreviewKey {
    source_revision: u64,
    request: ComposeRequest,
}

#[derive(Debug, Default)]
pub struct PreviewDriver {
    issued: u64,
    last_key: Option<PreviewKey>,
    current: Option<Preview>,
}

impl PreviewDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a ticket for a compose about to start.
    pub fn begin(&mut self) -> PreviewTicket {
        self.issued += 1;
        PreviewTicket(self.issued)
    }

    /// Publish a finished compose. Returns false if a newer ticket exists.
    pub fn publish(&mut self, ticket: PreviewTicket, width: u32, height: u32, png: Vec<u8>) -> bool {
        if ticket.0 != self.issued {
            tracing::debug!(ticket = ticket.0, latest = self.issued, "dropping stale preview");
            return false;
        }

        self.current = Some(Preview {
            revision: ticket.0,
            width,
            height,
            png,
        });
        true
    }

    /// Recompose from the session if its compose inputs changed.
    pub fn refresh(&mut self, session: &EditSession) -> Result<PreviewUpdate, EncodeError> {
        let Some(source) = session.source() else {
            if self.current.is_some() || self.last_key.is_some() {
                self.clear();
                return Ok(PreviewUpdate::Cleared);
            }
            return Ok(PreviewUpdate::Unchanged);
        };

        let Some(request) = session.compose_request() else {
            return Ok(self.drop_stale());
        };

        let key = PreviewKey {
            source_revision: session.source_revision(),
            request,
        };
        if self.last_key == Some(key) {
            return Ok(PreviewUpdate::Unchanged);
        }

        let ticket = self.begin();
        let Some(image) = compose(source, &request, session.config().resample) else {
            return Ok(self.drop_stale());
        };
        let png = encode_png(&image.pixels, image.width, image.height)?;

        if !self.publish(ticket, image.width, image.height, png) {
            return Ok(PreviewUpdate::Unchanged);
        }
        self.last_key = Some(key);

        tracing::debug!(revision = ticket.0, "published preview");
        Ok(PreviewUpdate::Updated)
    }

    pub fn current(&self) -> Option<&Preview> {
        self.current.as_ref()
    }

    /// Drop the preview and invalidate any compose still in flight.
    pub fn clear(&mut self) {
        self.issued += 1;
        self.last_key = None;
        self.current = None;
    }

    /// The current inputs cannot be composed; the old preview no longer matches them.
    fn drop_stale(&mut self) -> PreviewUpdate {
        if self.current.is_none() && self.last_key.is_none() {
            return PreviewUpdate::Unchanged;
        }
        self.clear();
        PreviewUpdate::Cleared
    }
}
