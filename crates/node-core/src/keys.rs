//! Keys of associative containers. Mapping keys are always text, so map keys
//! must be text-like, numeric or a derived enum.

use crate::error::{DeserializationError, Result};

/// A type usable as the key of a `HashMap`/`BTreeMap` field.
pub trait MapKey: Sized {
    fn to_key(&self) -> String;

    fn from_key(key: &str) -> Result<Self>;
}

impl MapKey for String {
    fn to_key(&self) -> String {
        self.clone()
    }

    fn from_key(key: &str) -> Result<Self> {
        Ok(key.to_string())
    }
}

impl MapKey for char {
    fn to_key(&self) -> String {
        self.to_string()
    }

    fn from_key(key: &str) -> Result<Self> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DeserializationError::InvalidText {
                target: "char",
                message: format!("`{key}` is not a single character"),
            }
            .into()),
        }
    }
}

impl MapKey for bool {
    fn to_key(&self) -> String {
        self.to_string()
    }

    fn from_key(key: &str) -> Result<Self> {
        key.parse().map_err(|e: std::str::ParseBoolError| {
            DeserializationError::InvalidText {
                target: "bool",
                message: e.to_string(),
            }
            .into()
        })
    }
}

macro_rules! numeric_key {
    ($($t:ty),*) => {$(
        impl MapKey for $t {
            fn to_key(&self) -> String {
                self.to_string()
            }

            fn from_key(key: &str) -> Result<Self> {
                key.parse().map_err(|e: std::num::ParseIntError| {
                    DeserializationError::InvalidText {
                        target: stringify!($t),
                        message: e.to_string(),
                    }
                    .into()
                })
            }
        }
    )*};
}

numeric_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
