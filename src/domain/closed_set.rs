use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// A string enum whose values are fixed. Anything that is not one of the
/// listed strings, including a number or `null`, fails to deserialize with an
/// error that names the allowed values.
pub(crate) trait ClosedSet: Copy + Sized + 'static {
    const VARIANTS: &'static [&'static str];

    fn all() -> &'static [Self];

    fn as_str(&self) -> &'static str;
}

struct ClosedSetVisitor<T>(PhantomData<T>);

impl<'de, T: ClosedSet> Visitor<'de> for ClosedSetVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("one of ")?;
        for (i, variant) in T::VARIANTS.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "`{}`", variant)?;
        }
        Ok(())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<T, E> {
        T::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == v)
            .ok_or_else(|| E::unknown_variant(v, T::VARIANTS))
    }
}

pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: ClosedSet,
{
    deserializer.deserialize_str(ClosedSetVisitor(PhantomData))
}
