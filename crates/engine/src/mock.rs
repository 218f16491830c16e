//! Synthetic target for tests
//!
//! A block-based fake address space plus map-backed object locator and name
//! resolver. Reads are counted, and address ranges can be made to fault or be
//! guarded (reads that touch a guarded range are recorded as violations).

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use uelayout_sdk::FNameRef;

use crate::error::ReadFault;
use crate::locator::{NameResolver, ObjectLocator};
use crate::memory::MemoryAccessor;

/// Where `alloc_object` puts the shared fake vtable
const VTABLE_REGION: usize = 0x7f00_0000;

/// First comparison index handed out by `MapNameResolver`
const FIRST_NAME_INDEX: u32 = 0x00a1_0001;

/// Fake address space made of zero-initialised blocks
#[derive(Default)]
pub struct SyntheticMemory {
    blocks: BTreeMap<usize, Vec<u8>>,
    faulting: Vec<Range<usize>>,
    guarded: Vec<Range<usize>>,
    fault_everything: bool,
    reads: AtomicUsize,
    violations: Mutex<Vec<Range<usize>>>,
}

impl SyntheticMemory {
    /// Create an empty address space
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a zeroed block of `size` bytes at `address`
    ///
    /// # Panics
    /// Panics if the block overlaps an existing one.
    pub fn alloc(&mut self, address: usize, size: usize) -> usize {
        let end = address + size;
        let overlaps = self
            .blocks
            .iter()
            .any(|(&base, data)| address < base + data.len() && base < end);
        assert!(!overlaps, "block {:#x}..{:#x} overlaps", address, end);

        self.blocks.insert(address, vec![0; size]);
        address
    }

    /// Map a block that starts with a valid vtable pointer
    pub fn alloc_object(&mut self, address: usize, size: usize) -> usize {
        let vtable = self.shared_vtable();
        self.alloc(address, size);
        self.write_ptr(address, vtable);
        address
    }

    /// Fake vtable whose first slot points at readable "code"
    pub fn shared_vtable(&mut self) -> usize {
        if !self.blocks.contains_key(&VTABLE_REGION) {
            self.alloc(VTABLE_REGION, 0x200);
            self.write_ptr(VTABLE_REGION, VTABLE_REGION + 0x100);
        }
        VTABLE_REGION
    }

    /// Overwrite mapped bytes
    ///
    /// # Panics
    /// Panics if the range is not fully inside one block.
    pub fn write_bytes(&mut self, address: usize, bytes: &[u8]) {
        let (&base, data) = self
            .blocks
            .range_mut(..=address)
            .next_back()
            .unwrap_or_else(|| panic!("write to unmapped {:#x}", address));
        let start = address - base;
        let dst = data
            .get_mut(start..start + bytes.len())
            .unwrap_or_else(|| panic!("write past block end at {:#x}", address));
        dst.copy_from_slice(bytes);
    }

    /// Write a pointer
    pub fn write_ptr(&mut self, address: usize, value: usize) {
        self.write_bytes(address, &(value as u64).to_le_bytes());
    }

    /// Write a u32
    pub fn write_u32(&mut self, address: usize, value: u32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Write an i32
    pub fn write_i32(&mut self, address: usize, value: i32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Write a packed name reference
    pub fn write_name(&mut self, address: usize, name: FNameRef) {
        self.write_bytes(address, &name.to_le_bytes());
    }

    /// Make every read touching `range` fault
    pub fn fault_range(&mut self, range: Range<usize>) {
        self.faulting.push(range);
    }

    /// Make every read fault
    pub fn fault_all(&mut self) {
        self.fault_everything = true;
    }

    /// Record reads touching `range` as violations
    pub fn guard(&mut self, range: Range<usize>) {
        self.guarded.push(range);
    }

    /// Guarded ranges that were read so far
    pub fn violations(&self) -> Vec<Range<usize>> {
        self.violations.lock().clone()
    }

    /// Number of `read_bytes` calls so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Reset the read counter
    pub fn reset_read_count(&self) {
        self.reads.store(0, Ordering::SeqCst);
    }
}

fn overlaps(range: &Range<usize>, start: usize, end: usize) -> bool {
    start < range.end && range.start < end
}

impl MemoryAccessor for SyntheticMemory {
    fn read_bytes(&self, address: usize, buf: &mut [u8]) -> Result<(), ReadFault> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if address == 0 {
            return Err(ReadFault::Null);
        }
        let end = address.checked_add(buf.len()).ok_or(ReadFault::Overflow {
            address,
            len: buf.len(),
        })?;

        if self.fault_everything || self.faulting.iter().any(|r| overlaps(r, address, end)) {
            return Err(ReadFault::Unreadable(address));
        }

        for range in self.guarded.iter().filter(|r| overlaps(r, address, end)) {
            self.violations.lock().push(range.clone());
        }

        let (&base, data) = self
            .blocks
            .range(..=address)
            .next_back()
            .ok_or(ReadFault::Unreadable(address))?;
        let start = address - base;
        let src = data
            .get(start..start + buf.len())
            .ok_or(ReadFault::Unreadable(address))?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

/// Object locator backed by a name -> address map
#[derive(Debug, Default, Clone)]
pub struct MapLocator {
    objects: HashMap<String, usize>,
}

impl MapLocator {
    /// Create an empty locator
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object
    pub fn insert(&mut self, qualified_name: &str, address: usize) {
        self.objects.insert(qualified_name.to_string(), address);
    }

    /// Builder-style `insert`
    pub fn with(mut self, qualified_name: &str, address: usize) -> Self {
        self.insert(qualified_name, address);
        self
    }
}

impl ObjectLocator for MapLocator {
    fn find(&self, qualified_name: &str) -> Option<usize> {
        self.objects.get(qualified_name).copied()
    }
}

/// Name resolver backed by an interned string table
#[derive(Debug, Clone)]
pub struct MapNameResolver {
    names: HashMap<u32, String>,
    next_index: u32,
}

impl Default for MapNameResolver {
    fn default() -> Self {
        Self {
            names: HashMap::new(),
            next_index: FIRST_NAME_INDEX,
        }
    }
}

impl MapNameResolver {
    /// Create an empty name table
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning its packed reference
    pub fn intern(&mut self, name: &str) -> FNameRef {
        if let Some((&index, _)) = self.names.iter().find(|(_, n)| n.as_str() == name) {
            return FNameRef::new(index);
        }
        let index = self.next_index;
        self.next_index += 1;
        self.names.insert(index, name.to_string());
        FNameRef::new(index)
    }
}

impl NameResolver for MapNameResolver {
    fn resolve(&self, name: FNameRef) -> Option<String> {
        let base = self.names.get(&name.comparison_index)?;
        if name.number == 0 {
            Some(base.clone())
        } else {
            Some(format!("{}_{}", base, name.number - 1))
        }
    }
}
