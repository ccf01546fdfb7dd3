use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    sync::Arc,
};

use log::{debug, warn};

use super::{builtin::builtin_entries, Erased, ErasedConverter, LeafCodec, ValueConverter};

type ConverterTable = HashMap<TypeId, (&'static str, Arc<dyn ErasedConverter>)>;

/// Maps a concrete type to the leaf converter for it.
///
/// The registry is built once and is immutable afterwards, so it can be shared
/// between threads and conversions without locking. Resolution tries the
/// built-in converters first, then the user-registered ones; the first match
/// wins.
///
/// # Examples
///
/// ```
/// use csv_mapper::convert::ConverterRegistry;
///
/// let registry = ConverterRegistry::new();
/// assert!(registry.resolve::<u32>().is_some());
/// assert!(registry.resolve::<Vec<u32>>().is_none());
/// ```
pub struct ConverterRegistry {
    builtin: ConverterTable,
    user: ConverterTable,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterRegistry {
    /// Creates a registry holding only the built-in converters.
    pub fn new() -> Self {
        ConverterRegistryBuilder::new().build()
    }

    /// Starts a registry with additional user converters.
    pub fn builder() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::new()
    }

    /// Resolves the leaf converter for `T`, if any.
    ///
    /// `None` is not an error by itself: the caller decides whether `T` can be
    /// handled as a collection or composite instead.
    pub fn resolve<T: 'static>(&self) -> Option<LeafCodec> {
        let id = TypeId::of::<T>();
        self.builtin
            .get(&id)
            .or_else(|| self.user.get(&id))
            .map(|(name, converter)| LeafCodec::new(name, Arc::clone(converter)))
    }

    /// Returns `true` if a converter exists for `T`.
    pub fn contains<T: 'static>(&self) -> bool {
        let id = TypeId::of::<T>();
        self.builtin.contains_key(&id) || self.user.contains_key(&id)
    }

    /// Number of user-registered converters.
    pub fn user_len(&self) -> usize {
        self.user.len()
    }
}

/// A builder for configuring a [`ConverterRegistry`].
///
/// # Examples
///
/// ```
/// use csv_mapper::convert::{ConverterRegistry, ValueConverter};
///
/// struct Percent;
///
/// impl ValueConverter for Percent {
///     type Value = f32;
///
///     fn try_serialize(&self, value: &f32, out: &mut String) -> bool {
///         out.push_str(&format!("{}%", value * 100.0));
///         true
///     }
///
///     fn try_deserialize(&self, text: &str) -> Option<f32> {
///         text.strip_suffix('%')?.parse::<f32>().ok().map(|v| v / 100.0)
///     }
/// }
///
/// // f32 already has a built-in converter, which keeps precedence.
/// let registry = ConverterRegistry::builder().register(Percent).build();
/// assert_eq!(registry.user_len(), 1);
/// ```
#[derive(Default)]
pub struct ConverterRegistryBuilder {
    user: ConverterTable,
}

impl ConverterRegistryBuilder {
    pub fn new() -> Self {
        Self {
            user: HashMap::new(),
        }
    }

    /// Registers `converter` for its `Value` type.
    ///
    /// Registering a second converter for the same type replaces the first.
    pub fn register<C: ValueConverter>(mut self, converter: C) -> Self {
        let name = type_name::<C::Value>();
        if self
            .user
            .insert(
                TypeId::of::<C::Value>(),
                (name, Arc::new(Erased(converter))),
            )
            .is_some()
        {
            debug!("Replaced user converter for `{name}`");
        }
        self
    }

    pub fn build(self) -> ConverterRegistry {
        let builtin: ConverterTable = builtin_entries()
            .into_iter()
            .map(|(id, name, converter)| (id, (name, converter)))
            .collect();

        for (id, (name, _)) in &self.user {
            if builtin.contains_key(id) {
                warn!("User converter for `{name}` is shadowed by the built-in converter");
            }
        }

        ConverterRegistry {
            builtin,
            user: self.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Spear(u8);

    struct SpearConverter;

    impl ValueConverter for SpearConverter {
        type Value = Spear;

        fn try_serialize(&self, value: &Spear, out: &mut String) -> bool {
            out.push_str(&format!("spear:{}", value.0));
            true
        }

        fn try_deserialize(&self, text: &str) -> Option<Spear> {
            text.strip_prefix("spear:")?.parse().ok().map(Spear)
        }
    }

    struct ShoutingString;

    impl ValueConverter for ShoutingString {
        type Value = String;

        fn try_serialize(&self, value: &String, out: &mut String) -> bool {
            out.push_str(&value.to_uppercase());
            true
        }

        fn try_deserialize(&self, text: &str) -> Option<String> {
            Some(text.to_string())
        }
    }

    #[test]
    fn user_converter_should_be_resolved() {
        let registry = ConverterRegistry::builder().register(SpearConverter).build();

        let codec = registry.resolve::<Spear>().unwrap();
        let value = codec.read("spear:7").unwrap().downcast::<Spear>().unwrap();
        assert_eq!(*value, Spear(7));
        assert_eq!(codec.write(&Spear(3)).as_deref(), Some("spear:3"));
        assert!(codec.read("sword:7").is_none());
    }

    #[test]
    fn builtin_converter_should_win_over_user_converter() {
        let registry = ConverterRegistry::builder().register(ShoutingString).build();

        let codec = registry.resolve::<String>().unwrap();
        assert_eq!(codec.write(&"quiet".to_string()).as_deref(), Some("quiet"));
    }

    #[test]
    fn unknown_type_should_not_resolve() {
        let registry = ConverterRegistry::new();
        assert!(registry.resolve::<Spear>().is_none());
        assert!(!registry.contains::<Spear>());
        assert!(registry.contains::<i64>());
    }
}
