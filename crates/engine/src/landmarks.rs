//! Landmark object loading via the host's object locator

use uelayout_sdk::landmarks::{
    CLASS_CLASS, FIELD_CLASS, MATRIX_STRUCT, OBJECT_CLASS, SCRIPT_STRUCT_CLASS, STRUCT_CLASS,
    VECTOR_STRUCT,
};

use crate::error::LandmarkError;
use crate::locator::ObjectLocator;

/// Addresses of the well-known descriptors used as ground truth
///
/// Missing landmarks are `None`; each discovery pass asks only for the
/// landmarks it needs and aborts if one of those is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LandmarkSet {
    pub object_class: Option<usize>,
    pub field_class: Option<usize>,
    pub struct_class: Option<usize>,
    pub class_class: Option<usize>,
    pub script_struct_class: Option<usize>,
    /// Landmark-A: 4x4 matrix script struct
    pub matrix: Option<usize>,
    /// Landmark-B: 3-component vector script struct
    pub vector: Option<usize>,
}

/// `Object ⊂ Field ⊂ Struct ⊂ Class`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassChain {
    pub object_class: usize,
    pub field_class: usize,
    pub struct_class: usize,
    pub class_class: usize,
}

/// The three class descriptors checked for default objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseClasses {
    pub object_class: usize,
    pub field_class: usize,
    pub struct_class: usize,
}

impl BaseClasses {
    /// Iterate the descriptors in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        [self.object_class, self.field_class, self.struct_class].into_iter()
    }
}

/// Landmark-A and Landmark-B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatePair {
    pub matrix: usize,
    pub vector: usize,
}

fn require(value: Option<usize>, name: &'static str) -> Result<usize, LandmarkError> {
    value.ok_or(LandmarkError::NotFound(name))
}

impl LandmarkSet {
    /// The full superclass chain
    pub fn class_chain(&self) -> Result<ClassChain, LandmarkError> {
        Ok(ClassChain {
            object_class: require(self.object_class, OBJECT_CLASS)?,
            field_class: require(self.field_class, FIELD_CLASS)?,
            struct_class: require(self.struct_class, STRUCT_CLASS)?,
            class_class: require(self.class_class, CLASS_CLASS)?,
        })
    }

    /// Object, Field and Struct class descriptors
    pub fn base_classes(&self) -> Result<BaseClasses, LandmarkError> {
        Ok(BaseClasses {
            object_class: require(self.object_class, OBJECT_CLASS)?,
            field_class: require(self.field_class, FIELD_CLASS)?,
            struct_class: require(self.struct_class, STRUCT_CLASS)?,
        })
    }

    /// Matrix and Vector script structs
    pub fn aggregates(&self) -> Result<AggregatePair, LandmarkError> {
        Ok(AggregatePair {
            matrix: require(self.matrix, MATRIX_STRUCT)?,
            vector: require(self.vector, VECTOR_STRUCT)?,
        })
    }
}

/// Look up every landmark once
///
/// Missing landmarks are logged but do not fail the load; the passes that
/// need them report the error.
#[tracing::instrument(skip_all)]
pub fn load_landmarks(locator: &dyn ObjectLocator) -> LandmarkSet {
    let find = |label: &str, name: &str| {
        let found = locator.find(name);
        match found {
            Some(address) => tracing::info!("{}: {:#x}", label, address),
            None => tracing::debug!("{}: not found ({})", label, name),
        }
        found
    };

    LandmarkSet {
        object_class: find("UObject", OBJECT_CLASS),
        field_class: find("UField", FIELD_CLASS),
        struct_class: find("UStruct", STRUCT_CLASS),
        class_class: find("UClass", CLASS_CLASS),
        script_struct_class: find("UScriptStruct", SCRIPT_STRUCT_CLASS),
        matrix: find("Matrix", MATRIX_STRUCT),
        vector: find("Vector", VECTOR_STRUCT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MapLocator;

    #[test]
    fn test_load_partial_set() {
        let locator = MapLocator::new()
            .with(OBJECT_CLASS, 0x1000)
            .with(FIELD_CLASS, 0x2000)
            .with(STRUCT_CLASS, 0x3000)
            .with(VECTOR_STRUCT, 0x5000);

        let set = load_landmarks(&locator);
        assert_eq!(set.object_class, Some(0x1000));
        assert_eq!(set.class_class, None);

        assert_eq!(
            set.class_chain(),
            Err(LandmarkError::NotFound(CLASS_CLASS))
        );
        let bases = set.base_classes().unwrap();
        assert_eq!(bases.iter().collect::<Vec<_>>(), vec![0x1000, 0x2000, 0x3000]);
        assert_eq!(
            set.aggregates(),
            Err(LandmarkError::NotFound(MATRIX_STRUCT))
        );
    }
}
