bitflags::bitflags! {
    /// Member modifiers relevant to binding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Reachable from outside the declaring type.
        const PUBLIC = 1 << 0;
        /// Belongs to the type rather than to instances. Never bound.
        const STATIC = 1 << 1;
        /// Excluded from encoding unless re-exposed by a property annotation.
        const TRANSIENT = 1 << 2;
    }
}

/// Binding annotations on a field or method.
///
/// `property` mirrors a rename annotation: `Some("")` only exposes the member
/// under its default name, `Some(name)` also renames it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotations {
    pub property: Option<&'static str>,
    pub ignore: bool,
    pub any_getter: bool,
    pub any_setter: bool,
}

impl Annotations {
    #[inline]
    pub const fn new() -> Self {
        Self {
            property: None,
            ignore: false,
            any_getter: false,
            any_setter: false,
        }
    }

    /// Exposes the member under `name`.
    #[inline]
    pub const fn rename(mut self, name: &'static str) -> Self {
        self.property = Some(name);
        self
    }

    /// Exposes the member under its default name.
    #[inline]
    pub const fn property(mut self) -> Self {
        if self.property.is_none() {
            self.property = Some("");
        }
        self
    }

    #[inline]
    pub const fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    #[inline]
    pub const fn any_getter(mut self) -> Self {
        self.any_getter = true;
        self
    }

    #[inline]
    pub const fn any_setter(mut self) -> Self {
        self.any_setter = true;
        self
    }

    /// The non-empty rename value, if any.
    #[inline]
    pub fn renamed(&self) -> Option<&'static str> {
        self.property.filter(|name| !name.is_empty())
    }

    /// Whether a property annotation is present at all.
    #[inline]
    pub fn is_exposed(&self) -> bool {
        self.property.is_some()
    }
}
