//! `UScriptStruct::CppStructOps` discovery
//!
//! The struct-ops table starts with a vtable pointer followed by the
//! struct's size. The matrix and vector landmarks have known sizes, in
//! either single or double precision builds.

use uelayout_engine::{offset_address, safe_read, AggregatePair};
use uelayout_sdk::landmarks::{
    MATRIX_SIZE_DOUBLE, MATRIX_SIZE_FLOAT, VECTOR_SIZE_DOUBLE, VECTOR_SIZE_FLOAT,
};
use uelayout_sdk::uobject::POINTER_SIZE;

use super::{pointer_steps, LayoutBruteforcer};

/// Floating point width of the target's math types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Float,
    Double,
}

impl Precision {
    /// Classify a `(matrix, vector)` size pair; mixed pairs are rejected
    pub fn from_sizes(matrix: i32, vector: i32) -> Option<Self> {
        match (matrix, vector) {
            (MATRIX_SIZE_FLOAT, VECTOR_SIZE_FLOAT) => Some(Self::Float),
            (MATRIX_SIZE_DOUBLE, VECTOR_SIZE_DOUBLE) => Some(Self::Double),
            _ => None,
        }
    }
}

/// Result of the struct-ops pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructOpsLayout {
    pub offset: usize,
    pub precision: Precision,
}

impl LayoutBruteforcer<'_> {
    /// Find the struct-ops offset, scanning from `start`
    #[tracing::instrument(skip_all, fields(start = format_args!("{:#x}", start)))]
    pub fn find_struct_ops(&self, pair: &AggregatePair, start: usize) -> Option<StructOpsLayout> {
        let found = pointer_steps(start, self.scan.ceiling).find_map(|offset| {
            let matrix = self.ops_size(pair.matrix, offset)?;
            let vector = self.ops_size(pair.vector, offset)?;
            match Precision::from_sizes(matrix, vector) {
                Some(precision) => Some(StructOpsLayout { offset, precision }),
                None => {
                    tracing::trace!(
                        "[UScriptStruct] Rejected sizes ({}, {}) at {:#x}",
                        matrix,
                        vector,
                        offset
                    );
                    None
                }
            }
        })?;

        tracing::info!(
            "[UScriptStruct] Found StructOps at offset {:#x} ({:?} precision)",
            found.offset,
            found.precision
        );
        Some(found)
    }

    /// Size stored in the ops table pointed to by `script_struct + offset`
    fn ops_size(&self, script_struct: usize, offset: usize) -> Option<i32> {
        let ops = self.read_polymorphic_at(script_struct, offset)?;
        safe_read::<i32>(self.memory, offset_address(ops, POINTER_SIZE)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ScanConfig;
    use crate::testing::{World, WorldLayout};

    use super::*;

    fn find(world: &World, start: usize) -> Option<StructOpsLayout> {
        let scan = ScanConfig::default();
        let forcer = LayoutBruteforcer::new(&world.memory, &world.names, &scan);
        forcer.find_struct_ops(&world.landmarks().aggregates().unwrap(), start)
    }

    #[test]
    fn test_precision_pairs() {
        assert_eq!(Precision::from_sizes(64, 12), Some(Precision::Float));
        assert_eq!(Precision::from_sizes(128, 24), Some(Precision::Double));
        assert_eq!(Precision::from_sizes(64, 24), None);
        assert_eq!(Precision::from_sizes(128, 12), None);
    }

    #[test]
    fn test_float_ops() {
        let world = World::build(WorldLayout::default());
        assert_eq!(
            find(&world, 0x40),
            Some(StructOpsLayout {
                offset: 0xC8,
                precision: Precision::Float,
            })
        );
    }

    #[test]
    fn test_double_ops() {
        let world = World::build(WorldLayout {
            precision: Precision::Double,
            ..WorldLayout::default()
        });
        assert_eq!(
            find(&world, 0x40).map(|layout| layout.precision),
            Some(Precision::Double)
        );
    }

    #[test]
    fn test_mixed_sizes_rejected_and_scan_continues() {
        let mut world = World::build(WorldLayout::default());
        let aggregates = world.landmarks().aggregates().unwrap();
        let bogus = world.plant_ops(0x0060_0000, 64, 24);
        world.memory.write_ptr(aggregates.matrix + 0xB8, bogus.0);
        world.memory.write_ptr(aggregates.vector + 0xB8, bogus.1);

        assert_eq!(find(&world, 0x40).map(|layout| layout.offset), Some(0xC8));
    }

    #[test]
    fn test_start_past_ops() {
        let world = World::build(WorldLayout::default());
        assert_eq!(find(&world, 0xD0), None);
    }
}
