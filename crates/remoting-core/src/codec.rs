//! Parameter codecs.
//!
//! Every positional parameter travels as a string (or `null`). A [`Codec`]
//! turns that slot into a typed value and back. Codecs are looked up by type
//! in a [`CodecTable`] once, when a function is bound, so no per-call
//! reflection happens.
//!
//! The default table treats `String` and `Option<String>` as pass-through;
//! every other type is JSON.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use serde::Serialize;
use serde::de::DeserializeOwned;

use remoting_protocols::CodecError;

/// Types that can appear as a bound parameter or stream item.
pub trait RemoteParam: Serialize + DeserializeOwned + Send + 'static {}

impl<T> RemoteParam for T where T: Serialize + DeserializeOwned + Send + 'static {}

type DecodeFn<T> = Arc<dyn Fn(Option<&str>) -> Result<T, CodecError> + Send + Sync>;
type EncodeFn<T> = Arc<dyn Fn(&T) -> Result<Option<String>, CodecError> + Send + Sync>;

/// Converts one parameter slot to and from `T`.
pub struct Codec<T> {
    decode: DecodeFn<T>,
    encode: EncodeFn<T>,
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            decode: self.decode.clone(),
            encode: self.encode.clone(),
        }
    }
}

impl<T: 'static> Codec<T> {
    pub fn new<D, E>(decode: D, encode: E) -> Self
    where
        D: Fn(Option<&str>) -> Result<T, CodecError> + Send + Sync + 'static,
        E: Fn(&T) -> Result<Option<String>, CodecError> + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(decode),
            encode: Arc::new(encode),
        }
    }

    pub fn decode(&self, raw: Option<&str>) -> Result<T, CodecError> {
        (self.decode)(raw)
    }

    pub fn encode(&self, value: &T) -> Result<Option<String>, CodecError> {
        (self.encode)(value)
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Codec<T> {
    /// JSON codec. A `null` slot decodes as the JSON literal `null`, and a
    /// value serializing to `null` encodes as a `null` slot.
    pub fn json() -> Self {
        Self::new(
            |raw| {
                serde_json::from_str(raw.unwrap_or("null"))
                    .map_err(|e| CodecError::decode::<T>(e))
            },
            |value| {
                let json = serde_json::to_value(value).map_err(|e| CodecError::encode::<T>(e))?;
                if json.is_null() {
                    return Ok(None);
                }
                serde_json::to_string(&json)
                    .map(Some)
                    .map_err(|e| CodecError::encode::<T>(e))
            },
        )
    }
}

impl Codec<String> {
    /// Pass-through codec. A `null` slot is rejected.
    pub fn text() -> Self {
        Self::new(
            |raw| {
                raw.map(str::to_string)
                    .ok_or_else(|| CodecError::decode::<String>("null for a required value"))
            },
            |value| Ok(Some(value.clone())),
        )
    }
}

impl Codec<Option<String>> {
    /// Pass-through codec with `null` mapped to `None`.
    pub fn optional_text() -> Self {
        Self::new(|raw| Ok(raw.map(str::to_string)), |value| Ok(value.clone()))
    }
}

/// Codecs keyed by the type they handle.
pub struct CodecTable {
    codecs: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl CodecTable {
    /// Table with the pass-through text codecs installed.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register(Codec::<String>::text());
        table.register(Codec::<Option<String>>::optional_text());
        table
    }

    /// Table with no overrides; every type falls back to JSON.
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Install or replace the codec for `T`.
    pub fn register<T: 'static>(&mut self, codec: Codec<T>) {
        self.codecs.insert(TypeId::of::<T>(), Box::new(codec));
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.codecs.contains_key(&TypeId::of::<T>())
    }

    /// The codec registered for `T`, or JSON.
    pub fn resolve<T: RemoteParam>(&self) -> Codec<T> {
        self.codecs
            .get(&TypeId::of::<T>())
            .and_then(|codec| codec.downcast_ref::<Codec<T>>())
            .cloned()
            .unwrap_or_else(Codec::json)
    }
}

impl Default for CodecTable {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_CODECS: LazyLock<CodecTable> = LazyLock::new(CodecTable::new);

/// Encode a value into a parameter slot with the default codecs.
///
/// Clients use this to build `params` that a server with default codecs
/// will decode back into the same value.
pub fn encode_param<T: RemoteParam>(value: &T) -> Result<Option<String>, CodecError> {
    DEFAULT_CODECS.resolve::<T>().encode(value)
}

/// Decode a parameter slot with the default codecs.
pub fn decode_param<T: RemoteParam>(raw: Option<&str>) -> Result<T, CodecError> {
    DEFAULT_CODECS.resolve::<T>().decode(raw)
}
