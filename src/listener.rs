use std::{io, net::SocketAddr, rc::Rc};

use log::*;
use socket2::Socket;
use tokio::{net::UdpSocket, select, sync::oneshot};

use crate::{
	error::Error,
	resolver::{Policy, Resolver},
	zone::Zone,
};

// largest possible UDP payload, anything shorter can cut a valid query
const RECV_BUF_LEN: usize = 0x10000;

// the send half of the socket, split out so a failing send can be tested
// without a socket that fails on demand
#[allow(async_fn_in_trait)]
pub trait DatagramSink {
	async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;
}

impl DatagramSink for UdpSocket {
	async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
		UdpSocket::send_to(self, buf, target).await
	}
}

pub async fn bind(addr: SocketAddr, recv_buffer: Option<usize>) -> io::Result<UdpSocket> {
	let s = UdpSocket::bind(addr).await?;
	let Some(size) = recv_buffer else {
		return Ok(s);
	};
	// round trip through socket2 for SO_RCVBUF
	let s = Socket::from(s.into_std()?);
	s.set_recv_buffer_size(size)?;
	debug!("SO_RCVBUF {}", s.recv_buffer_size()?);
	UdpSocket::from_std(s.into())
}

// one datagram, start to finish
// Ok is the number of bytes sent back, every Err means nothing was sent
pub async fn handle_datagram(
	resolver: &Resolver<'_>,
	payload: &[u8],
	from: SocketAddr,
	sink: &impl DatagramSink,
) -> Result<usize, Error> {
	let resp = resolver.resolve(payload)?;
	let len = sink.send_to(&resp, from).await.map_err(Error::Send)?;
	Ok(len)
}

// ICMP port unreachable from an earlier reply can surface as a receive error
// on some platforms, that says nothing about the socket itself
fn recv_error_is_fatal(e: &io::Error) -> bool {
	!matches!(
		e.kind(),
		io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionRefused
	)
}

pub async fn serve(
	s: UdpSocket,
	zone: Rc<Zone>,
	policy: Policy,
	mut quit_signal: oneshot::Receiver<()>,
) -> io::Result<()> {
	info!("listening on UDP {}", s.local_addr()?);
	let resolver = Resolver::new(&zone, policy);

	let mut buf = vec![0u8; RECV_BUF_LEN];
	loop {
		select! {
			r = s.recv_from(&mut buf) => {
				let (len, addr) = match r {
					Ok(v) => v,
					Err(e) if !recv_error_is_fatal(&e) => {
						warn!("udp recv error: {e}");
						continue;
					}
					Err(e) => {
						error!("udp recv error: {e}");
						return Err(e);
					}
				};
				trace!("udp recv {} bytes from {}", len, addr);
				match handle_datagram(&resolver, &buf[..len], addr, &s).await {
					Ok(len) => trace!("udp send {} bytes to {}", len, addr),
					Err(e @ (Error::EmptyQuestion | Error::LookupMiss(_))) => {
						debug!("{addr}: {e}, dropped")
					}
					Err(e) => warn!("{addr}: {e}"),
				}
			}
			_ = &mut quit_signal => {
				info!("exiting");
				break;
			}
		}
	}
	Ok(())
}
