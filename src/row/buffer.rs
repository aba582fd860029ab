//! # RowBuffer - Row Byte Storage
//!
//! `RowBuffer` owns the contiguous bytes of one row together with the layout
//! and resolver the row is bound to. Everything that reads or mutates a row
//! goes through a `RowCursor`; the buffer itself only knows about regions and
//! byte shifting.
//!
//! ## Row Layout
//!
//! ```text
//! +---------+-----------------------------+-----------------+------------------+
//! | header  | fixed region                | variable region | sparse region    |
//! | 5 bytes | bitmask + fixed payloads    | present columns | fields to end    |
//! +---------+-----------------------------+-----------------+------------------+
//!            |<------ layout.size() ----->|
//! ```
//!
//! The header and fixed region never change length after `init_layout`. All
//! growth and shrinkage happens after the fixed region through `splice`, which
//! moves every later byte by the size delta.
//!
//! ## Reuse
//!
//! ```ignore
//! let mut row = RowBuffer::new(DEFAULT_ROW_CAPACITY);
//! for record in records {
//!     row.init_layout(HYBRID_ROW_VERSION, layout.clone(), resolver.clone());
//!     // ... write through cursors ...
//!     row.write_to(&mut out)?;
//!     row.reset();
//! }
//! ```

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use eyre::{ensure, Result, WrapErr};
use tracing::{debug, trace};
use zerocopy::IntoBytes;

use crate::config::{DEFAULT_ROW_CAPACITY, HEADER_SIZE, SCOPE_COUNT_SIZE};
use crate::layouts::{Layout, LayoutBit, LayoutResolver};
use crate::schema::SchemaId;

use super::element;
use super::header::{RowHeader, ScopeCount};
use super::result::{corrupt, RowError, RowResult};

pub struct RowBuffer {
    buffer: Vec<u8>,
    layout: Option<Arc<Layout>>,
    resolver: Option<Arc<dyn LayoutResolver>>,
}

impl RowBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            layout: None,
            resolver: None,
        }
    }

    /// Starts a new, empty row of `layout`: writes the header, zeroes the
    /// fixed region (every nullable column absent) and binds the resolver used
    /// for UDT scopes.
    pub fn init_layout(
        &mut self,
        version: u8,
        layout: Arc<Layout>,
        resolver: Arc<dyn LayoutResolver>,
    ) {
        self.buffer.clear();
        self.buffer
            .extend_from_slice(RowHeader::new(version, layout.schema_id()).as_bytes());
        self.buffer.resize(HEADER_SIZE + layout.size(), 0);
        self.layout = Some(layout);
        self.resolver = Some(resolver);
    }

    /// Returns to the empty, header-less, unbound state. Capacity is kept.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.layout = None;
        self.resolver = None;
    }

    /// Loads an encoded row. The header must carry `version` and a schema id
    /// the resolver knows, and the bytes must parse as a complete row of that
    /// layout. On failure the buffer is left reset and `false` is returned.
    pub fn read_from(
        &mut self,
        bytes: &[u8],
        version: u8,
        resolver: Arc<dyn LayoutResolver>,
    ) -> bool {
        self.reset();

        let header = match RowHeader::from_bytes(bytes) {
            Ok(header) => *header,
            Err(e) => {
                debug!(error = %e, "rejected row");
                return false;
            }
        };
        if header.version() != version {
            debug!(
                expected = version,
                found = header.version(),
                "rejected row with unexpected version"
            );
            return false;
        }

        let schema_id = SchemaId(header.schema_id());
        let layout = match resolver.resolve(schema_id) {
            Ok(layout) => layout,
            Err(e) => {
                debug!(schema_id = %schema_id, error = %e, "rejected row with unknown schema");
                return false;
            }
        };
        if bytes.len() < HEADER_SIZE + layout.size() {
            debug!(
                len = bytes.len(),
                fixed_end = HEADER_SIZE + layout.size(),
                "rejected truncated row"
            );
            return false;
        }

        self.buffer.extend_from_slice(bytes);
        self.layout = Some(Arc::clone(&layout));
        self.resolver = Some(resolver);

        let valid = element::validate_root(self, &layout).is_ok();
        if !valid {
            debug!(schema_id = %schema_id, "rejected malformed row");
            self.reset();
        }
        valid
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        ensure!(self.layout.is_some(), "row buffer is not bound to a layout");
        writer
            .write_all(&self.buffer)
            .wrap_err("failed to write row")
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn layout(&self) -> Option<&Arc<Layout>> {
        self.layout.as_ref()
    }

    pub fn resolver(&self) -> Option<&Arc<dyn LayoutResolver>> {
        self.resolver.as_ref()
    }

    pub fn version(&self) -> Option<u8> {
        self.header().map(|h| h.version())
    }

    pub fn schema_id(&self) -> Option<SchemaId> {
        self.header().map(|h| SchemaId(h.schema_id()))
    }

    fn header(&self) -> Option<&RowHeader> {
        self.layout.as_ref()?;
        RowHeader::from_bytes(&self.buffer).ok()
    }

    /// First byte after the root fixed region; nothing before it may move.
    fn fixed_end(&self) -> Result<usize> {
        match &self.layout {
            Some(layout) => Ok(HEADER_SIZE + layout.size()),
            None => eyre::bail!("row buffer is not bound to a layout"),
        }
    }

    /// Inserts `n` zero bytes at `offset`, moving everything after it up.
    pub fn shift_insert(&mut self, offset: usize, n: usize) -> Result<()> {
        let fixed_end = self.fixed_end()?;
        ensure!(
            offset >= fixed_end && offset <= self.buffer.len(),
            "shift offset {} outside [{}, {}]",
            offset,
            fixed_end,
            self.buffer.len()
        );
        self.splice(offset, 0, &vec![0u8; n]);
        Ok(())
    }

    /// Removes `n` bytes at `offset`, moving everything after it down.
    pub fn shift_delete(&mut self, offset: usize, n: usize) -> Result<()> {
        let fixed_end = self.fixed_end()?;
        ensure!(
            offset >= fixed_end,
            "shift offset {} inside the fixed region ending at {}",
            offset,
            fixed_end
        );
        ensure!(
            offset
                .checked_add(n)
                .is_some_and(|end| end <= self.buffer.len()),
            "cannot delete {} bytes at {} from a row of {} bytes",
            n,
            offset,
            self.buffer.len()
        );
        self.splice(offset, n, &[]);
        Ok(())
    }

    /// Replaces `remove` bytes at `offset` with `bytes`. Callers validate the
    /// range first; this is the single place row length changes.
    pub(crate) fn splice(&mut self, offset: usize, remove: usize, bytes: &[u8]) {
        trace!(
            offset,
            remove,
            insert = bytes.len(),
            len = self.buffer.len(),
            "row splice"
        );
        if remove == bytes.len() {
            self.buffer[offset..offset + remove].copy_from_slice(bytes);
        } else {
            self.buffer
                .splice(offset..offset + remove, bytes.iter().copied());
        }
    }

    pub(crate) fn bytes(&self, offset: usize, len: usize) -> RowResult<&[u8]> {
        let end = offset.checked_add(len).ok_or(RowError::TypeMismatch)?;
        self.buffer.get(offset..end).ok_or(RowError::TypeMismatch)
    }

    pub(crate) fn byte(&self, offset: usize) -> RowResult<u8> {
        self.buffer
            .get(offset)
            .copied()
            .ok_or(RowError::TypeMismatch)
    }

    pub(crate) fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> RowResult {
        let end = offset.checked_add(bytes.len()).ok_or(RowError::TypeMismatch)?;
        let slot = self
            .buffer
            .get_mut(offset..end)
            .ok_or(RowError::TypeMismatch)?;
        slot.copy_from_slice(bytes);
        Ok(())
    }

    pub(crate) fn read_count(&self, offset: usize) -> RowResult<u32> {
        let count = ScopeCount::from_bytes(self.bytes(offset, SCOPE_COUNT_SIZE)?).map_err(corrupt)?;
        Ok(count.count())
    }

    pub(crate) fn write_count(&mut self, offset: usize, count: u32) -> RowResult {
        self.write_bytes(offset, ScopeCount::new(count).as_bytes())
    }

    /// Reads a bit of the bitmask that starts at `fixed_start`.
    pub(crate) fn bit(&self, fixed_start: usize, bit: LayoutBit) -> RowResult<bool> {
        Ok(self.byte(fixed_start + bit.byte_offset())? & bit.mask() != 0)
    }

    pub(crate) fn set_bit(&mut self, fixed_start: usize, bit: LayoutBit, on: bool) -> RowResult {
        let slot = self
            .buffer
            .get_mut(fixed_start + bit.byte_offset())
            .ok_or(RowError::TypeMismatch)?;
        if on {
            *slot |= bit.mask();
        } else {
            *slot &= !bit.mask();
        }
        Ok(())
    }

    pub(crate) fn resolve(&self, schema_id: SchemaId) -> Option<Arc<Layout>> {
        self.resolver.as_ref()?.resolve(schema_id).ok()
    }
}

impl Default for RowBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_CAPACITY)
    }
}

impl fmt::Debug for RowBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowBuffer")
            .field("len", &self.buffer.len())
            .field("layout", &self.layout.as_ref().map(|l| l.name()))
            .field("schema_id", &self.schema_id())
            .finish()
    }
}
