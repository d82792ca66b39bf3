use std::{
	collections::{hash_map::Entry, HashMap},
	fmt::Display,
	net::Ipv4Addr,
	str::FromStr,
};

use hickory_proto::rr::Name;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ZoneError {
	#[error("invalid IPv4 address for {owner}: {value}")]
	InvalidAddress { owner: String, value: String },

	#[error("invalid alias target for {owner}: {value}")]
	InvalidName { owner: String, value: String },

	#[error("unsupported record type: {0}")]
	UnsupportedType(String),

	#[error("duplicate record for {0}")]
	Duplicate(String),

	#[error("expecting NAME,TYPE,VALUE, got {0:?}")]
	Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
	A(Ipv4Addr),
	Cname(Name),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
	owner: String,
	kind: RecordKind,
}

impl ResourceRecord {
	pub fn a(owner: impl Into<String>, addr: &str) -> Result<Self, ZoneError> {
		let owner = owner.into();
		let addr = addr.parse().map_err(|_| ZoneError::InvalidAddress {
			owner: owner.clone(),
			value: addr.to_owned(),
		})?;
		Ok(ResourceRecord {
			owner,
			kind: RecordKind::A(addr),
		})
	}

	pub fn cname(owner: impl Into<String>, target: &str) -> Result<Self, ZoneError> {
		let owner = owner.into();
		// no labels would encode as the root
		let target = Name::from_ascii(target)
			.ok()
			.filter(|n| n.num_labels() > 0)
			.ok_or_else(|| ZoneError::InvalidName {
				owner: owner.clone(),
				value: target.to_owned(),
			})?;
		Ok(ResourceRecord {
			owner,
			kind: RecordKind::Cname(target),
		})
	}

	pub fn owner(&self) -> &str {
		&self.owner
	}

	pub fn kind(&self) -> &RecordKind {
		&self.kind
	}
}

// NAME,TYPE,VALUE as accepted on the command line
impl FromStr for ResourceRecord {
	type Err = ZoneError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.splitn(3, ',').map(str::trim);
		let (Some(owner), Some(ty), Some(value)) = (parts.next(), parts.next(), parts.next())
		else {
			return Err(ZoneError::Malformed(s.to_owned()));
		};
		if owner.is_empty() || value.is_empty() {
			return Err(ZoneError::Malformed(s.to_owned()));
		}
		if ty.eq_ignore_ascii_case("A") {
			ResourceRecord::a(owner, value)
		} else if ty.eq_ignore_ascii_case("CNAME") {
			ResourceRecord::cname(owner, value)
		} else {
			Err(ZoneError::UnsupportedType(ty.to_owned()))
		}
	}
}

impl Display for ResourceRecord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.kind {
			RecordKind::A(addr) => write!(f, "{} A {}", self.owner, addr),
			RecordKind::Cname(target) => write!(f, "{} CNAME {}", self.owner, target),
		}
	}
}

// Immutable after construction. Keys are matched byte for byte: no case
// folding, no trailing dot handling, no wildcards. Callers have to present
// names exactly as they were stored.
#[derive(Debug, Default)]
pub struct Zone {
	records: HashMap<String, ResourceRecord>,
}

impl Zone {
	pub fn new(records: impl IntoIterator<Item = ResourceRecord>) -> Result<Zone, ZoneError> {
		let mut map = HashMap::new();
		for rr in records {
			match map.entry(rr.owner.clone()) {
				Entry::Occupied(e) => return Err(ZoneError::Duplicate(e.key().clone())),
				Entry::Vacant(e) => {
					e.insert(rr);
				}
			}
		}
		Ok(Zone { records: map })
	}

	/// The table served when no records are configured.
	pub fn builtin() -> Zone {
		let records = [
			("arnav.com", RecordKind::A(Ipv4Addr::new(1, 2, 3, 4))),
			("blocg.arnav.com", RecordKind::A(Ipv4Addr::new(5, 6, 7, 8))),
			(
				"www.arnav.com",
				RecordKind::Cname(Name::from_ascii("arnav.com").unwrap_or_else(|_| Name::root())),
			),
		];
		Zone {
			records: records
				.into_iter()
				.map(|(owner, kind)| {
					let owner = owner.to_owned();
					(owner.clone(), ResourceRecord { owner, kind })
				})
				.collect(),
		}
	}

	pub fn lookup(&self, name: &str) -> Option<&ResourceRecord> {
		self.records.get(name)
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
		self.records.values()
	}
}
