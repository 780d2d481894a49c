//! An in-process stand-in for a guest, so the allocator can be tested without compiling wasm.
//!
//! Unlike a real guest allocator this one is strict about releases: anything that isn't exactly
//! a live reservation is rejected, which is what lets tests see double frees.
//!
//! Also home to CapturedLogs, for tests that assert on log output.
use crate::memory::GuestMemory;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use wasm_marshal_common::*;

const FAKE_MEMORY_BYTES: usize = 64 * 1024;
const FAKE_HEAP_BASE: GuestPtr = 8;

#[derive(Debug)]
pub struct FakeGuest {
    memory: Vec<u8>,
    next: GuestPtr,
    live: BTreeMap<GuestPtr, Len>,
    reservations: usize,
    fail_reserve: bool,
}

impl Default for FakeGuest {
    fn default() -> Self {
        Self::with_capacity(FAKE_MEMORY_BYTES)
    }
}

impl FakeGuest {
    /// The bump pointer happily runs past `capacity`, only reads and writes are bounds checked.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            memory: vec![0; capacity],
            next: FAKE_HEAP_BASE,
            live: BTreeMap::new(),
            reservations: 0,
            fail_reserve: false,
        }
    }

    pub fn failing_reservations(mut self) -> Self {
        self.fail_reserve = true;
        self
    }

    /// Number of ranges reserved and not yet released.
    pub fn live(&self) -> usize {
        self.live.len()
    }

    /// Number of successful reservations ever made.
    pub fn reservations(&self) -> usize {
        self.reservations
    }

    /// What a guest's `string_descriptor` export does: leak the text, leak a descriptor pointing
    /// at it and return the descriptor's offset.
    pub fn produce_text(&mut self, text: &str) -> GuestPtr {
        let len: Len = text.len().try_into().unwrap();
        let text_ptr = self.reserve(len).unwrap();
        self.write(text_ptr, text.as_bytes()).unwrap();
        let descriptor_ptr = self.reserve(DESCRIPTOR_BYTES as Len).unwrap();
        self.write(
            descriptor_ptr,
            &StringDescriptor::from([text_ptr, len]).to_le_bytes(),
        )
        .unwrap();
        descriptor_ptr
    }

    fn range(&self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<std::ops::Range<usize>> {
        let start = guest_ptr as usize;
        match start.checked_add(len as usize) {
            Some(end) if end <= self.memory.len() => Ok(start..end),
            _ => Err(MarshalError::Memory {
                guest_ptr,
                len,
                reason: format!("fake memory is {} bytes", self.memory.len()),
            }),
        }
    }
}

impl GuestMemory for FakeGuest {
    fn reserve(&mut self, len: Len) -> MarshalResult<GuestPtr> {
        if self.fail_reserve {
            return Err(MarshalError::Reservation {
                len,
                reason: "fake guest is out of memory".into(),
            });
        }
        let guest_ptr = self.next;
        // zero length reservations still get a distinct offset
        self.next = guest_ptr
            .checked_add(len.max(1))
            .ok_or_else(|| MarshalError::Reservation {
                len,
                reason: "fake address space exhausted".into(),
            })?;
        self.live.insert(guest_ptr, len);
        self.reservations += 1;
        Ok(guest_ptr)
    }

    fn release(&mut self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<()> {
        match self.live.get(&guest_ptr) {
            Some(live_len) if *live_len == len => {
                self.live.remove(&guest_ptr);
                Ok(())
            }
            Some(live_len) => Err(MarshalError::Release {
                guest_ptr,
                len,
                reason: format!("reserved with length {}", live_len),
            }),
            None => Err(MarshalError::Release {
                guest_ptr,
                len,
                reason: "not a live reservation".into(),
            }),
        }
    }

    fn read(&self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<Vec<u8>> {
        Ok(self.memory[self.range(guest_ptr, len)?].to_vec())
    }

    fn write(&mut self, guest_ptr: GuestPtr, bytes: &[u8]) -> MarshalResult<()> {
        let len: Len = bytes.len().try_into()?;
        let range = self.range(guest_ptr, len)?;
        self.memory[range].copy_from_slice(bytes);
        Ok(())
    }
}

/// Collects formatted tracing output so tests can assert on what was logged.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// A subscriber writing into this buffer, for `tracing::subscriber::with_default`.
    pub fn subscriber(&self, max_level: tracing::Level) -> impl tracing::Subscriber + Send + Sync {
        let logs = self.clone();
        tracing_subscriber::fmt()
            .with_max_level(max_level)
            .with_ansi(false)
            .with_writer(move || logs.clone())
            .finish()
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
