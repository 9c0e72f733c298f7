use serde_core::ser::{Error as _, Serialize, Serializer};

use crate::Reflect;
use crate::codec::CodecFactory;

/// Serializes a value through a [`CodecFactory`].
///
/// Lets bound values take part in any `serde` serializer.
///
/// ```
/// use jb_bind::codec::{CodecFactory, Json};
///
/// let factory = CodecFactory::new();
/// let value = vec![1_u8, 2];
/// let text = serde_json::to_string(&Json::new(&factory, &value)).unwrap();
/// assert_eq!(text, "[1,2]");
/// ```
#[derive(Clone, Copy)]
pub struct Json<'a> {
    factory: &'a CodecFactory,
    value: &'a dyn Reflect,
}

impl<'a> Json<'a> {
    #[inline]
    pub fn new(factory: &'a CodecFactory, value: &'a dyn Reflect) -> Self {
        Self { factory, value }
    }
}

impl Serialize for Json<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.factory
            .encode(self.value)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}
