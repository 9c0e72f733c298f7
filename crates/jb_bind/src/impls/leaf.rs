use alloc::string::String;
use core::time::Duration;

use crate::delegate::DelegateCodec;
use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};
use crate::value::Untyped;

macro_rules! impl_leaf_typed {
    ($kind:ident => $($ty:ty),+ $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    TypeInfo::new::<Self>(TypeKind::$kind)
                        .with_delegate(DelegateCodec::serde::<Self>())
                })
            }
        }
    )+};
}

impl_leaf_typed!(Primitive =>
    bool, char,
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    f32, f64,
);

impl_leaf_typed!(Str => String);

impl_leaf_typed!(Tree => serde_json::Value, Untyped);

impl_leaf_typed!(Opaque => Duration);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use serde_json::json;

    use crate::info::{TypeKind, Typed};
    use crate::value::Untyped;

    #[test]
    fn leaf_kinds() {
        assert_eq!(u8::type_info().kind(), TypeKind::Primitive);
        assert_eq!(String::type_info().kind(), TypeKind::Str);
        assert_eq!(String::type_info().type_name(), "String");
        assert_eq!(Untyped::type_info().kind(), TypeKind::Tree);
    }

    #[test]
    fn leaf_delegates() {
        let delegate = f64::type_info().delegate().unwrap();
        assert_eq!(delegate.to_tree(&1.5_f64).unwrap(), json!(1.5));

        let delegate = Untyped::type_info().delegate().unwrap();
        let back = delegate.from_tree(json!({"n": 2.0})).unwrap();
        let back = back.take::<Untyped>().unwrap();
        assert_eq!(back.get("n"), Some(&Untyped::Int(2)));
    }
}
