use hickory_proto::{
	op::{Header, Message, ResponseCode},
	rr::{
		rdata::{A, CNAME},
		RData, Record, RecordType,
	},
};
use log::*;

use crate::{
	codec,
	error::Error,
	zone::{RecordKind, Zone},
};

/// Knobs for the behaviors where a plain authoritative server would differ.
/// `Policy::default()` drops unknown names and always answers with the
/// stored record's own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
	/// TTL of `A` answers.
	pub a_ttl: u32,
	/// TTL of `CNAME` answers.
	pub cname_ttl: u32,
	/// Answer `NXDOMAIN` for unknown names instead of staying silent.
	pub negative_answers: bool,
	/// Only answer an `A` record to `A`/`ANY` queries, NODATA otherwise.
	/// Aliases still answer every type.
	pub strict_types: bool,
}

impl Default for Policy {
	fn default() -> Self {
		Policy {
			a_ttl: 0,
			cname_ttl: 300,
			negative_answers: false,
			strict_types: false,
		}
	}
}

// stateless between calls, one resolve() per datagram
pub struct Resolver<'z> {
	zone: &'z Zone,
	policy: Policy,
}

impl<'z> Resolver<'z> {
	pub fn new(zone: &'z Zone, policy: Policy) -> Self {
		Resolver { zone, policy }
	}

	// raw datagram in, raw response out
	// Err means nothing should be sent
	pub fn resolve(&self, datagram: &[u8]) -> Result<Vec<u8>, Error> {
		let req = codec::decode(datagram).map_err(Error::Decode)?;
		trace!("dns query: {}", req);
		let resp = self.respond(&req)?;
		trace!("dns response: {}", resp);
		codec::encode(&resp).map_err(Error::Encode)
	}

	pub fn respond(&self, req: &Message) -> Result<Message, Error> {
		// only the first question is ever answered, the rest are just echoed
		let q = req.queries().first().ok_or(Error::EmptyQuestion)?;
		let name = codec::presented(q.name());

		let mut header = Header::response_from_request(req.header());
		header.set_authoritative(true);

		let Some(rr) = self.zone.lookup(&name) else {
			if !self.policy.negative_answers {
				return Err(Error::LookupMiss(name));
			}
			debug!("{} {} -> NXDOMAIN", name, q.query_type());
			header.set_response_code(ResponseCode::NXDomain);
			return Ok(mk_resp(header, req, None));
		};

		// dispatch on what is stored, not on what was asked for
		let answer = match rr.kind() {
			RecordKind::A(addr) => {
				if self.policy.strict_types
					&& !matches!(q.query_type(), RecordType::A | RecordType::ANY)
				{
					None
				} else {
					Some(Record::from_rdata(
						q.name().clone(),
						self.policy.a_ttl,
						RData::A(A(*addr)),
					))
				}
			}
			RecordKind::Cname(target) => Some(Record::from_rdata(
				q.name().clone(),
				self.policy.cname_ttl,
				RData::CNAME(CNAME(target.clone())),
			)),
		};

		match &answer {
			Some(a) => debug!("{} {} -> {}", name, q.query_type(), a),
			None => debug!("{} {} -> NODATA ({})", name, q.query_type(), rr),
		}
		Ok(mk_resp(header, req, answer))
	}
}

fn mk_resp(header: Header, req: &Message, answer: Option<Record>) -> Message {
	let mut resp = Message::new();
	resp.set_header(header);
	resp.add_queries(req.queries().iter().cloned());
	if let Some(a) = answer {
		resp.add_answer(a);
	}
	resp
}
