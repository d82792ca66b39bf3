// wire format <-> Message, stateless
// hickory-proto does the work, every decode path ends in a Result whatever
// bytes come in

use hickory_proto::{error::ProtoResult, op::Message, rr::Name};

pub fn decode(bytes: &[u8]) -> ProtoResult<Message> {
	Message::from_vec(bytes)
}

pub fn encode(msg: &Message) -> ProtoResult<Vec<u8>> {
	msg.to_vec()
}

// presentation form used as the zone key, "arnav.com" rather than "arnav.com."
// no case folding here, the zone matches exactly what the client sent
pub fn presented(name: &Name) -> String {
	let mut s = name.to_ascii();
	if s.len() > 1 && s.ends_with('.') {
		s.pop();
	}
	s
}

#[cfg(test)]
mod tests {
	use std::net::Ipv4Addr;

	use hickory_proto::{
		op::{Header, MessageType, Query},
		rr::{
			rdata::{A, CNAME},
			RData, Record, RecordType,
		},
	};

	use super::*;

	#[test]
	fn round_trip() {
		let name = Name::from_ascii("www.arnav.com.").unwrap();
		let mut header = Header::new();
		header.set_id(0xbeef);
		header.set_message_type(MessageType::Response);
		header.set_authoritative(true);

		let mut msg = Message::new();
		msg.set_header(header);
		msg.add_query(Query::query(name.clone(), RecordType::CNAME));
		msg.add_answer(Record::from_rdata(
			name.clone(),
			300,
			RData::CNAME(CNAME(Name::from_ascii("arnav.com").unwrap())),
		));

		let bytes = encode(&msg).unwrap();
		let back = decode(&bytes).unwrap();
		assert_eq!(back.id(), 0xbeef);
		assert_eq!(back.message_type(), MessageType::Response);
		assert!(back.authoritative());
		assert_eq!(back.queries(), msg.queries());
		assert_eq!(back.answers().len(), 1);
		let rr = &back.answers()[0];
		assert_eq!(rr.record_type(), RecordType::CNAME);
		assert_eq!(rr.ttl(), 300);
		match rr.data() {
			Some(RData::CNAME(CNAME(target))) => assert_eq!(presented(target), "arnav.com"),
			other => panic!("expecting CNAME rdata, got {other:?}"),
		}

		let mut msg = Message::new();
		msg.set_id(7);
		msg.add_query(Query::query(Name::from_ascii("arnav.com").unwrap(), RecordType::A));
		msg.add_answer(Record::from_rdata(
			Name::from_ascii("arnav.com").unwrap(),
			0,
			RData::A(A(Ipv4Addr::new(1, 2, 3, 4))),
		));
		let back = decode(&encode(&msg).unwrap()).unwrap();
		assert_eq!(back.id(), 7);
		assert_eq!(
			back.answers()[0].data(),
			Some(&RData::A(A(Ipv4Addr::new(1, 2, 3, 4))))
		);
	}

	#[test]
	fn garbage_is_an_error() {
		assert!(decode(&[]).is_err());
		// short header
		assert!(decode(&[0x12, 0x34, 0x01, 0x00, 0x00]).is_err());
		// header claims one question, nothing follows
		assert!(decode(&[0, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0]).is_err());
		// label length runs past the end
		let mut bytes = vec![0, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0];
		bytes.extend_from_slice(&[0x3f, b'a', b'b']);
		assert!(decode(&bytes).is_err());
		// compression pointer to itself
		let mut bytes = vec![0, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0];
		bytes.extend_from_slice(&[0xc0, 0x0c, 0, 1, 0, 1]);
		assert!(decode(&bytes).is_err());

		// nothing here may panic
		let mut seed = 0x2545_f491u32;
		for len in 0..64 {
			let bytes: Vec<u8> = (0..len)
				.map(|_| {
					seed ^= seed << 13;
					seed ^= seed >> 17;
					seed ^= seed << 5;
					seed as u8
				})
				.collect();
			let _ = decode(&bytes);
		}
	}

	#[test]
	fn presented_names() {
		assert_eq!(presented(&Name::from_ascii("arnav.com.").unwrap()), "arnav.com");
		assert_eq!(presented(&Name::from_ascii("arnav.com").unwrap()), "arnav.com");
		assert_eq!(presented(&Name::from_ascii("ArNaV.CoM.").unwrap()), "ArNaV.CoM");
		assert_eq!(presented(&Name::root()), ".");
	}
}
