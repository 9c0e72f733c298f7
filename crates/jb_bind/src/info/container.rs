use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::Reflect;
use crate::error::AccessError;
use crate::info::TypeInfo;

/// Structural access to a container value.
///
/// Converters use these to encode and decode elements one by one through the
/// codec factory, so managed element types keep their bindings.
#[derive(Clone, Copy)]
pub enum ContainerOps {
    Sequence(SequenceOps),
    Optional(OptionalOps),
    Map(MapOps),
}

/// Lists, sets and arrays.
#[derive(Clone, Copy)]
pub struct SequenceOps {
    /// Declared element type.
    pub item: fn() -> &'static TypeInfo,
    /// Borrows the elements, `None` if the value is not this container.
    pub items: fn(&dyn Reflect) -> Option<Vec<&dyn Reflect>>,
    /// Builds the container from decoded elements.
    pub collect: fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, AccessError>,
}

/// `Option<T>`.
#[derive(Clone, Copy)]
pub struct OptionalOps {
    pub item: fn() -> &'static TypeInfo,
    pub get: fn(&dyn Reflect) -> Option<Option<&dyn Reflect>>,
    pub wrap: fn(Option<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, AccessError>,
}

/// Maps with `String` keys.
#[derive(Clone, Copy)]
pub struct MapOps {
    pub value: fn() -> &'static TypeInfo,
    pub entries: fn(&dyn Reflect) -> Option<Vec<(&str, &dyn Reflect)>>,
    pub collect: fn(Vec<(String, Box<dyn Reflect>)>) -> Result<Box<dyn Reflect>, AccessError>,
}
