//! Common types used throughout the Decision Ledger.

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::SystemTime;

// Timestamp //
//***********//
/// Unix timestamp in seconds, serialized as an RFC 3339 string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
	}

	pub fn to_iso_string(self) -> String {
		DateTime::from_timestamp(self.0, 0)
			.map_or_else(|| self.0.to_string(), |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.to_iso_string())
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_iso_string())
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Secs(i64),
			Iso(String),
		}

		match Repr::deserialize(deserializer)? {
			Repr::Secs(secs) => Ok(Timestamp(secs)),
			Repr::Iso(s) => DateTime::parse_from_rfc3339(&s)
				.map(|dt| Timestamp(dt.timestamp()))
				.map_err(serde::de::Error::custom),
		}
	}
}

// Patch //
//*******//
/// Tri-state field for partial updates: absent, explicit null, or a value.
///
/// Use with `#[serde(default)]` so that missing fields become `Undefined`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Patch::Null)
	}

	pub fn value(&self) -> Option<&T> {
		match self {
			Patch::Value(v) => Some(v),
			_ => None,
		}
	}

	/// `None` for undefined, `Some(None)` for null, `Some(Some(v))` for a value
	pub fn as_option(&self) -> Option<Option<&T>> {
		match self {
			Patch::Undefined => None,
			Patch::Null => Some(None),
			Patch::Value(v) => Some(Some(v)),
		}
	}
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
	T: Deserialize<'de>,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		// Only called when the field is present; absent fields hit `Default`
		Option::<T>::deserialize(deserializer).map(|v| v.map_or(Patch::Null, Patch::Value))
	}
}


// vim: ts=4
