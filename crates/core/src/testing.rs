//! Synthetic reflection world shared by the discovery tests

use std::sync::Arc;

use uelayout_engine::mock::{MapLocator, MapNameResolver, SyntheticMemory};
use uelayout_engine::{safe_read, LandmarkSet, TargetSession};
use uelayout_sdk::landmarks::{
    CLASS_CLASS, FIELD_CLASS, MATRIX_SIZE_DOUBLE, MATRIX_SIZE_FLOAT, MATRIX_STRUCT, OBJECT_CLASS,
    SCRIPT_STRUCT_CLASS, STRUCT_CLASS, VECTOR_SIZE_DOUBLE, VECTOR_SIZE_FLOAT, VECTOR_STRUCT,
};
use uelayout_sdk::uobject::{POINTER_SIZE, UOBJECT_CLASS_OFFSET, UOBJECT_NAME_OFFSET};

use crate::bruteforce::Precision;
use crate::config::ScanConfig;
use crate::gamedata::FallbackOffsets;
use crate::layout::ReflectionLayout;

/// Size of every landmark descriptor block
pub const DESCRIPTOR_SIZE: usize = 0x400;

const DESCRIPTOR_BASE: usize = 0x0010_0000;
const FIELD_BASE: usize = 0x0020_0000;
const DEFAULT_OBJECT_BASE: usize = 0x0030_0000;
const OPS_BASE: usize = 0x0040_0000;
const NOISE: usize = 0x0050_0000;
const NOISE_SIZE: usize = 0x200;

/// True offsets planted in the world
#[derive(Debug, Clone, Copy)]
pub struct WorldLayout {
    pub super_struct: usize,
    pub children: usize,
    pub field_name: usize,
    pub field_next: usize,
    pub default_object: usize,
    pub struct_ops: usize,
    pub precision: Precision,
}

impl Default for WorldLayout {
    fn default() -> Self {
        Self {
            super_struct: 0x38,
            children: 0x48,
            field_name: 0x10,
            field_next: 0x20,
            default_object: 0x100,
            struct_ops: 0xC8,
            precision: Precision::Float,
        }
    }
}

/// Landmark descriptors, the vector's fields and their support objects
pub struct World {
    pub layout: WorldLayout,
    pub memory: SyntheticMemory,
    pub names: MapNameResolver,
    pub object_class: usize,
    pub field_class: usize,
    pub struct_class: usize,
    pub class_class: usize,
    pub script_struct_class: usize,
    pub matrix: usize,
    pub vector: usize,
    /// `X`, `Y` and `Z`
    pub fields: [usize; 3],
    /// Default objects of Object, Field and Struct
    pub default_objects: [usize; 3],
    missing: Vec<&'static str>,
}

impl World {
    pub fn build(layout: WorldLayout) -> Self {
        let mut memory = SyntheticMemory::new();
        let mut names = MapNameResolver::new();

        let mut descriptor = |index: usize, name: &str| {
            let address = memory.alloc_object(DESCRIPTOR_BASE + index * 0x1000, DESCRIPTOR_SIZE);
            memory.write_name(address + UOBJECT_NAME_OFFSET, names.intern(name));
            address
        };
        let object_class = descriptor(0, "Object");
        let field_class = descriptor(1, "Field");
        let struct_class = descriptor(2, "Struct");
        let class_class = descriptor(3, "Class");
        let script_struct_class = descriptor(4, "ScriptStruct");
        let matrix = descriptor(5, "Matrix");
        let vector = descriptor(6, "Vector");

        for class in [object_class, field_class, struct_class, class_class] {
            memory.write_ptr(class + UOBJECT_CLASS_OFFSET, class_class);
        }
        memory.write_ptr(script_struct_class + UOBJECT_CLASS_OFFSET, class_class);
        for aggregate in [matrix, vector] {
            memory.write_ptr(aggregate + UOBJECT_CLASS_OFFSET, script_struct_class);
        }

        let superclasses = [
            (field_class, object_class),
            (struct_class, field_class),
            (class_class, struct_class),
            (script_struct_class, struct_class),
        ];
        for (child, parent) in superclasses {
            memory.write_ptr(child + layout.super_struct, parent);
        }

        let mut fields = [0; 3];
        for (index, axis) in ["X", "Y", "Z"].into_iter().enumerate() {
            let field = memory.alloc_object(FIELD_BASE + index * 0x1000, 0x200);
            memory.write_name(field + layout.field_name, names.intern(axis));
            fields[index] = field;
        }
        memory.write_ptr(fields[0] + layout.field_next, fields[1]);
        memory.write_ptr(fields[1] + layout.field_next, fields[2]);
        memory.write_ptr(vector + layout.children, fields[0]);

        let mut default_objects = [0; 3];
        for (index, class) in [object_class, field_class, struct_class]
            .into_iter()
            .enumerate()
        {
            let object = memory.alloc_object(DEFAULT_OBJECT_BASE + index * 0x1000, 0x40);
            memory.write_ptr(object + UOBJECT_CLASS_OFFSET, class);
            memory.write_ptr(class + layout.default_object, object);
            default_objects[index] = object;
        }

        let mut world = Self {
            layout,
            memory,
            names,
            object_class,
            field_class,
            struct_class,
            class_class,
            script_struct_class,
            matrix,
            vector,
            fields,
            default_objects,
            missing: Vec::new(),
        };

        let (matrix_size, vector_size) = match layout.precision {
            Precision::Float => (MATRIX_SIZE_FLOAT, VECTOR_SIZE_FLOAT),
            Precision::Double => (MATRIX_SIZE_DOUBLE, VECTOR_SIZE_DOUBLE),
        };
        let (matrix_ops, vector_ops) = world.plant_ops(OPS_BASE, matrix_size, vector_size);
        world.memory.write_ptr(matrix + layout.struct_ops, matrix_ops);
        world.memory.write_ptr(vector + layout.struct_ops, vector_ops);

        world.fill_noise();
        world.memory.reset_read_count();
        world
    }

    /// Allocate a pair of struct-ops tables with the given sizes
    pub fn plant_ops(&mut self, address: usize, matrix_size: i32, vector_size: i32) -> (usize, usize) {
        let matrix_ops = self.memory.alloc_object(address, 0x20);
        self.memory.write_i32(matrix_ops + POINTER_SIZE, matrix_size);
        let vector_ops = self.memory.alloc_object(address + 0x1000, 0x20);
        self.memory.write_i32(vector_ops + POINTER_SIZE, vector_size);
        (matrix_ops, vector_ops)
    }

    /// Point every empty slot of every descriptor at a polymorphic decoy
    fn fill_noise(&mut self) {
        let noise = self.memory.alloc_object(NOISE, NOISE_SIZE);
        let scan = ScanConfig::default();

        for descriptor in self.descriptors() {
            for offset in (scan.header_size..scan.ceiling).step_by(POINTER_SIZE) {
                // Keep the root of the class chain terminated
                if offset == self.layout.super_struct {
                    continue;
                }
                if safe_read::<usize>(&self.memory, descriptor + offset) == Some(0) {
                    self.memory.write_ptr(descriptor + offset, noise);
                }
            }
        }
    }

    fn descriptors(&self) -> [usize; 7] {
        [
            self.object_class,
            self.field_class,
            self.struct_class,
            self.class_class,
            self.script_struct_class,
            self.matrix,
            self.vector,
        ]
    }

    /// Flag landmark reads outside `[header_size, ceiling)`
    ///
    /// Class descriptors are legitimately dereferenced as pointer targets,
    /// so only their tails are guarded.
    pub fn guard_outside_window(&mut self, scan: &ScanConfig) {
        for descriptor in self.descriptors() {
            self.memory
                .guard(descriptor + scan.ceiling..descriptor + DESCRIPTOR_SIZE);
        }
        for aggregate in [self.matrix, self.vector] {
            self.memory.guard(aggregate..aggregate + scan.header_size);
        }
    }

    /// Make the decoy object unreadable
    pub fn fault_noise(&mut self) {
        self.memory.fault_range(NOISE..NOISE + NOISE_SIZE);
    }

    /// Hide a landmark from the object locator
    pub fn forget(&mut self, qualified_name: &'static str) {
        self.missing.push(qualified_name);
    }

    /// The landmark set as the locator would report it
    pub fn landmarks(&self) -> LandmarkSet {
        LandmarkSet {
            object_class: Some(self.object_class),
            field_class: Some(self.field_class),
            struct_class: Some(self.struct_class),
            class_class: Some(self.class_class),
            script_struct_class: Some(self.script_struct_class),
            matrix: Some(self.matrix),
            vector: Some(self.vector),
        }
    }

    fn locator(&self) -> MapLocator {
        let mut locator = MapLocator::new();
        let entries = [
            (OBJECT_CLASS, self.object_class),
            (FIELD_CLASS, self.field_class),
            (STRUCT_CLASS, self.struct_class),
            (CLASS_CLASS, self.class_class),
            (SCRIPT_STRUCT_CLASS, self.script_struct_class),
            (MATRIX_STRUCT, self.matrix),
            (VECTOR_STRUCT, self.vector),
        ];
        for (name, address) in entries {
            if !self.missing.contains(&name) {
                locator.insert(name, address);
            }
        }
        locator
    }

    /// Wrap the world in a discovery context with default settings
    pub fn into_layout(self) -> (ReflectionLayout, Arc<SyntheticMemory>) {
        self.into_layout_with(ScanConfig::default(), FallbackOffsets::builtin())
    }

    pub fn into_layout_with(
        self,
        scan: ScanConfig,
        fallback: FallbackOffsets,
    ) -> (ReflectionLayout, Arc<SyntheticMemory>) {
        let locator = self.locator();
        let memory = Arc::new(self.memory);
        let session = TargetSession::new(memory.clone(), Arc::new(locator), Arc::new(self.names));
        (ReflectionLayout::new(session, scan, fallback), memory)
    }
}
