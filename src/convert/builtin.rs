use std::{any::TypeId, fmt::Display, fmt::Write, marker::PhantomData, str::FromStr, sync::Arc};

use super::{Erased, ErasedConverter, ValueConverter};

/// Converts any type whose `Display` output is accepted back by its `FromStr`.
///
/// This covers integers, floats (Rust prints the shortest text that parses back
/// to the same value), `bool`, `char`, `String` and `uuid::Uuid`.
pub struct DisplayFromStr<T>(PhantomData<fn() -> T>);

impl<T> Default for DisplayFromStr<T> {
    fn default() -> Self {
        DisplayFromStr(PhantomData)
    }
}

impl<T> ValueConverter for DisplayFromStr<T>
where
    T: Display + FromStr + Send + 'static,
{
    type Value = T;

    fn try_serialize(&self, value: &T, out: &mut String) -> bool {
        write!(out, "{value}").is_ok()
    }

    fn try_deserialize(&self, text: &str) -> Option<T> {
        text.parse().ok()
    }
}

/// Stores a JSON document in a single column, written in compact form.
#[derive(Default)]
pub struct JsonConverter;

impl ValueConverter for JsonConverter {
    type Value = serde_json::Value;

    fn try_serialize(&self, value: &serde_json::Value, out: &mut String) -> bool {
        match serde_json::to_string(value) {
            Ok(json) => {
                out.push_str(&json);
                true
            }
            Err(_) => false,
        }
    }

    fn try_deserialize(&self, text: &str) -> Option<serde_json::Value> {
        serde_json::from_str(text).ok()
    }
}

#[cfg(feature = "chrono")]
pub use self::datetime::{NaiveDateTimeConverter, UtcDateTimeConverter};

#[cfg(feature = "chrono")]
mod datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};

    use crate::convert::ValueConverter;

    const NAIVE_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    /// ISO 8601 date and time without offset, e.g. `2024-03-01T08:30:00`.
    #[derive(Default)]
    pub struct NaiveDateTimeConverter;

    impl ValueConverter for NaiveDateTimeConverter {
        type Value = NaiveDateTime;

        fn try_serialize(&self, value: &NaiveDateTime, out: &mut String) -> bool {
            out.push_str(&value.format(NAIVE_DATE_TIME_FORMAT).to_string());
            true
        }

        fn try_deserialize(&self, text: &str) -> Option<NaiveDateTime> {
            NaiveDateTime::parse_from_str(text, NAIVE_DATE_TIME_FORMAT).ok()
        }
    }

    /// RFC 3339 timestamps normalised to UTC.
    #[derive(Default)]
    pub struct UtcDateTimeConverter;

    impl ValueConverter for UtcDateTimeConverter {
        type Value = DateTime<Utc>;

        fn try_serialize(&self, value: &DateTime<Utc>, out: &mut String) -> bool {
            out.push_str(&value.to_rfc3339());
            true
        }

        fn try_deserialize(&self, text: &str) -> Option<DateTime<Utc>> {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|value| value.with_timezone(&Utc))
        }
    }
}

pub(crate) type BuiltinEntry = (TypeId, &'static str, Arc<dyn ErasedConverter>);

fn entry<C: ValueConverter>(converter: C) -> BuiltinEntry {
    (
        TypeId::of::<C::Value>(),
        std::any::type_name::<C::Value>(),
        Arc::new(Erased(converter)),
    )
}

fn display_from_str<T>() -> BuiltinEntry
where
    T: Display + FromStr + Send + 'static,
{
    entry(DisplayFromStr::<T>::default())
}

/// Every converter the registry knows without registration.
#[cfg_attr(not(feature = "chrono"), allow(unused_mut))]
pub(crate) fn builtin_entries() -> Vec<BuiltinEntry> {
    let mut entries = vec![
        display_from_str::<bool>(),
        display_from_str::<char>(),
        display_from_str::<String>(),
        display_from_str::<i8>(),
        display_from_str::<i16>(),
        display_from_str::<i32>(),
        display_from_str::<i64>(),
        display_from_str::<i128>(),
        display_from_str::<isize>(),
        display_from_str::<u8>(),
        display_from_str::<u16>(),
        display_from_str::<u32>(),
        display_from_str::<u64>(),
        display_from_str::<u128>(),
        display_from_str::<usize>(),
        display_from_str::<f32>(),
        display_from_str::<f64>(),
        display_from_str::<uuid::Uuid>(),
        entry(JsonConverter),
    ];

    #[cfg(feature = "chrono")]
    entries.extend([
        display_from_str::<chrono::NaiveDate>(),
        display_from_str::<chrono::NaiveTime>(),
        entry(NaiveDateTimeConverter),
        entry(UtcDateTimeConverter),
    ]);

    entries
}
