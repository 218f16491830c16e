//! Discovery context for one target

use std::sync::OnceLock;

use uelayout_engine::{load_landmarks, LandmarkError, LandmarkSet, TargetSession};
use uelayout_sdk::landmarks::VECTOR_STRUCT;
use uelayout_sdk::uobject::POINTER_SIZE;
use uelayout_sdk::{DescriptorKind, LayoutField};

use super::table::{Claim, ClaimGuard, KindState, OffsetTable};
use crate::bruteforce::LayoutBruteforcer;
use crate::config::ScanConfig;
use crate::gamedata::FallbackOffsets;

/// Reflection layout of one target
///
/// Owns the offset table and runs each kind's discovery pass lazily, on the
/// first request for one of its offsets. Every accessor returns a usable
/// offset: the discovered one, or the fallback if discovery failed.
pub struct ReflectionLayout {
    target: TargetSession,
    scan: ScanConfig,
    fallback: FallbackOffsets,
    table: OffsetTable,
    landmarks: OnceLock<LandmarkSet>,
}

impl ReflectionLayout {
    pub fn new(target: TargetSession, scan: ScanConfig, fallback: FallbackOffsets) -> Self {
        Self {
            table: OffsetTable::new(&fallback),
            target,
            scan,
            fallback,
            landmarks: OnceLock::new(),
        }
    }

    /// Target this layout describes
    pub fn target(&self) -> &TargetSession {
        &self.target
    }

    /// Scan bounds in use
    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan
    }

    /// Fallback offsets the table was seeded with
    pub fn fallback(&self) -> &FallbackOffsets {
        &self.fallback
    }

    /// Offset table, without triggering discovery
    pub fn table(&self) -> &OffsetTable {
        &self.table
    }

    /// Landmark descriptors, looked up on first use
    pub fn landmarks(&self) -> &LandmarkSet {
        self.landmarks
            .get_or_init(|| load_landmarks(self.target.locator()))
    }

    /// Offset of `field`, discovering its kind first if needed
    pub fn get(&self, field: LayoutField) -> u32 {
        self.ensure(field.kind());
        self.table.offset(field)
    }

    /// Offset of `field` as an address delta
    pub fn offset(&self, field: LayoutField) -> usize {
        self.get(field) as usize
    }

    /// Current state of `kind`, without triggering discovery
    pub fn state(&self, kind: DescriptorKind) -> KindState {
        self.table.state(kind)
    }

    /// Run discovery for every kind
    pub fn discover_all(&self) {
        for kind in DescriptorKind::ALL {
            self.ensure(kind);
        }
    }

    /// Make sure discovery for `kind` has run, returning its state
    ///
    /// Blocks while another thread is scanning the same kind. A request from
    /// inside that kind's own scan returns [`KindState::Attempting`] so the
    /// caller falls through to the fallback offsets.
    pub fn ensure(&self, kind: DescriptorKind) -> KindState {
        let guard = match self.table.claim(kind) {
            Claim::Claimed(guard) => guard,
            Claim::Settled(state) => return state,
            Claim::Reentrant => {
                tracing::debug!("[{}] Re-entrant request during discovery", kind);
                return KindState::Attempting;
            }
        };

        tracing::debug!("[{}] Starting layout discovery", kind);
        let resolved = match kind {
            DescriptorKind::Field => self.discover_field(),
            DescriptorKind::Struct => self.discover_struct(&guard),
            DescriptorKind::Class => self.discover_class(&guard),
            DescriptorKind::ScriptStruct => self.discover_script_struct(&guard),
        };

        if resolved {
            guard.resolve()
        } else {
            guard.fail()
        }
    }

    fn forcer(&self) -> LayoutBruteforcer<'_> {
        LayoutBruteforcer::new(self.target.memory(), self.target.names(), &self.scan)
    }

    /// Field offsets come out of the struct pass
    fn discover_field(&self) -> bool {
        self.ensure(DescriptorKind::Struct);

        let resolved = [LayoutField::FieldName, LayoutField::FieldNext]
            .into_iter()
            .all(|field| self.table.is_discovered(field));
        if !resolved {
            tracing::error!(
                "[UField] Field layout incomplete, using fallback Name {:#x} Next {:#x}",
                self.table.offset(LayoutField::FieldName),
                self.table.offset(LayoutField::FieldNext)
            );
        }
        resolved
    }

    fn discover_struct(&self, guard: &ClaimGuard<'_>) -> bool {
        let landmarks = self.landmarks();
        let vector = landmarks
            .vector
            .ok_or(LandmarkError::NotFound(VECTOR_STRUCT));
        let (chain, vector) = match (landmarks.class_chain(), vector) {
            (Ok(chain), Ok(vector)) => (chain, vector),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("[UStruct] {}, using fallback offsets", e);
                return false;
            }
        };
        let forcer = self.forcer();

        let start = match forcer.find_super_struct(&chain) {
            Some(offset) => {
                commit(guard, LayoutField::SuperStruct, offset);
                self.scan.header_size
            }
            None => {
                let fallback = self.fallback.get(LayoutField::SuperStruct) as usize;
                tracing::error!(
                    "[UStruct] Failed to find SuperStruct, using fallback {:#x}",
                    fallback
                );
                (fallback + POINTER_SIZE).max(self.scan.header_size)
            }
        };

        let Some(list) = forcer.find_field_list(vector, start) else {
            tracing::error!(
                "[UStruct] Failed to find Children, using fallback {:#x}",
                self.fallback.get(LayoutField::Children)
            );
            return false;
        };

        commit(guard, LayoutField::Children, list.children);
        commit(guard, LayoutField::FieldName, list.name);
        if let Some(next) = list.next {
            commit(guard, LayoutField::FieldNext, next);
        }

        self.table.is_discovered(LayoutField::SuperStruct)
    }

    fn discover_class(&self, guard: &ClaimGuard<'_>) -> bool {
        let bases = match self.landmarks().base_classes() {
            Ok(bases) => bases,
            Err(e) => {
                tracing::error!("[UClass] {}, using fallback offsets", e);
                return false;
            }
        };

        match self.forcer().find_default_object(&bases) {
            Some(offset) => commit(guard, LayoutField::DefaultObject, offset),
            None => {
                tracing::error!(
                    "[UClass] Failed to find DefaultObject, using fallback {:#x}",
                    self.fallback.get(LayoutField::DefaultObject)
                );
                false
            }
        }
    }

    fn discover_script_struct(&self, guard: &ClaimGuard<'_>) -> bool {
        // Struct ops sit after the super struct pointer
        self.ensure(DescriptorKind::Struct);

        let aggregates = match self.landmarks().aggregates() {
            Ok(aggregates) => aggregates,
            Err(e) => {
                tracing::error!("[UScriptStruct] {}, using fallback offsets", e);
                return false;
            }
        };

        let start = (self.table.offset(LayoutField::SuperStruct) as usize + POINTER_SIZE)
            .max(self.scan.header_size);
        match self.forcer().find_struct_ops(&aggregates, start) {
            Some(found) => commit(guard, LayoutField::StructOps, found.offset),
            None => {
                tracing::error!(
                    "[UScriptStruct] Failed to find StructOps, using fallback {:#x}",
                    self.fallback.get(LayoutField::StructOps)
                );
                false
            }
        }
    }
}

/// Commit a scanned offset, rejecting anything that does not fit the table
fn commit(guard: &ClaimGuard<'_>, field: LayoutField, offset: usize) -> bool {
    match u32::try_from(offset) {
        Ok(offset) => guard.commit(field, offset),
        Err(_) => {
            tracing::warn!("[{}] Offset {:#x} for {} out of range", guard.kind(), offset, field);
            false
        }
    }
}
