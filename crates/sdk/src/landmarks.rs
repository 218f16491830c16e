//! Landmark object names and known sizes
//!
//! These strings must match exactly what the target's object registry
//! reports as the full name of each object.

/// Class descriptor of the root object type
pub const OBJECT_CLASS: &str = "Class /Script/CoreUObject.Object";

/// Class descriptor of `UField`
pub const FIELD_CLASS: &str = "Class /Script/CoreUObject.Field";

/// Class descriptor of `UStruct`
pub const STRUCT_CLASS: &str = "Class /Script/CoreUObject.Struct";

/// Class descriptor of `UClass`
pub const CLASS_CLASS: &str = "Class /Script/CoreUObject.Class";

/// Class descriptor of `UScriptStruct`
pub const SCRIPT_STRUCT_CLASS: &str = "Class /Script/CoreUObject.ScriptStruct";

/// 4x4 matrix script struct (Landmark-A)
pub const MATRIX_STRUCT: &str = "ScriptStruct /Script/CoreUObject.Matrix";

/// 3-component vector script struct (Landmark-B)
pub const VECTOR_STRUCT: &str = "ScriptStruct /Script/CoreUObject.Vector";

/// Field names of the vector landmark
pub const AXIS_NAMES: [&str; 3] = ["X", "Y", "Z"];

/// Matrix size with single-precision components
pub const MATRIX_SIZE_FLOAT: i32 = 4 * 4 * 4;

/// Matrix size with double-precision components
pub const MATRIX_SIZE_DOUBLE: i32 = 4 * 4 * 8;

/// Vector size with single-precision components
pub const VECTOR_SIZE_FLOAT: i32 = 3 * 4;

/// Vector size with double-precision components
pub const VECTOR_SIZE_DOUBLE: i32 = 3 * 8;

/// Check whether a resolved name is one of the vector's axis names
pub fn is_axis_name(name: &str) -> bool {
    AXIS_NAMES.contains(&name)
}
