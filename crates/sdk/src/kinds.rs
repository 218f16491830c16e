//! Descriptor kinds and discoverable layout fields
//!
//! The foreign reflection system has four descriptor kinds we care about.
//! Each kind owns a handful of pointer fields whose byte offsets change
//! between engine revisions and have to be discovered at runtime.

use std::fmt;

/// A reflection descriptor kind
///
/// Discriminants are stable and shared with the C ABI.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// Field list element (FField / UField)
    Field = 0,
    /// UStruct - anything with a super struct and a field list
    Struct = 1,
    /// UClass - a struct with a default object
    Class = 2,
    /// UScriptStruct - a struct with a struct-ops side table
    ScriptStruct = 3,
}

impl DescriptorKind {
    /// Number of descriptor kinds
    pub const COUNT: usize = 4;

    /// All kinds in discriminant order
    pub const ALL: [DescriptorKind; Self::COUNT] = [
        DescriptorKind::Field,
        DescriptorKind::Struct,
        DescriptorKind::Class,
        DescriptorKind::ScriptStruct,
    ];

    /// Dense index for table storage
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Engine-side type name, used as a log prefix
    pub const fn name(self) -> &'static str {
        match self {
            Self::Field => "UField",
            Self::Struct => "UStruct",
            Self::Class => "UClass",
            Self::ScriptStruct => "UScriptStruct",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A descriptor field whose byte offset is discovered at runtime
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutField {
    /// `UStruct::SuperStruct` - pointer to the parent struct
    SuperStruct = 0,
    /// `UStruct::Children` - pointer to the first field list element
    Children = 1,
    /// `FField::Name` - packed name of a field list element
    FieldName = 2,
    /// `FField::Next` - pointer to the next sibling field
    FieldNext = 3,
    /// `UClass::ClassDefaultObject` - pointer to the default instance
    DefaultObject = 4,
    /// `UScriptStruct::CppStructOps` - pointer to the struct-ops table
    StructOps = 5,
}

impl LayoutField {
    /// Number of layout fields
    pub const COUNT: usize = 6;

    /// All fields in discriminant order
    pub const ALL: [LayoutField; Self::COUNT] = [
        LayoutField::SuperStruct,
        LayoutField::Children,
        LayoutField::FieldName,
        LayoutField::FieldNext,
        LayoutField::DefaultObject,
        LayoutField::StructOps,
    ];

    /// Dense index for table storage
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The descriptor kind whose discovery pass owns this field
    pub const fn kind(self) -> DescriptorKind {
        match self {
            Self::SuperStruct | Self::Children => DescriptorKind::Struct,
            Self::FieldName | Self::FieldNext => DescriptorKind::Field,
            Self::DefaultObject => DescriptorKind::Class,
            Self::StructOps => DescriptorKind::ScriptStruct,
        }
    }

    /// Short field name
    pub const fn name(self) -> &'static str {
        match self {
            Self::SuperStruct => "SuperStruct",
            Self::Children => "Children",
            Self::FieldName => "Name",
            Self::FieldNext => "Next",
            Self::DefaultObject => "DefaultObject",
            Self::StructOps => "StructOps",
        }
    }

    /// Gamedata key, e.g. `UStruct::SuperStruct`
    pub fn key(self) -> String {
        format!("{}::{}", self.kind().name(), self.name())
    }

    /// Look up a field by its gamedata key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for LayoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.kind().name(), self.name())
    }
}

/// Raw discriminant did not name a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownDiscriminant(pub u32);

impl fmt::Display for UnknownDiscriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown discriminant: {}", self.0)
    }
}

impl std::error::Error for UnknownDiscriminant {}

impl TryFrom<u32> for DescriptorKind {
    type Error = UnknownDiscriminant;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(UnknownDiscriminant(value))
    }
}

impl TryFrom<u32> for LayoutField {
    type Error = UnknownDiscriminant;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(UnknownDiscriminant(value))
    }
}
