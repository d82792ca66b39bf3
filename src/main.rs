use std::{net::SocketAddr, process::ExitCode, rc::Rc};

use clap::Parser;
use log::*;
use tokio::{signal::ctrl_c, sync::oneshot, task};

use zonedns::{listener, Policy, ResourceRecord, Zone};

#[derive(Parser)]
pub struct Args {
	#[clap(short, long, default_value = "0.0.0.0:8080")]
	pub listen: SocketAddr,

	/// NAME,TYPE,VALUE with TYPE one of A, CNAME; repeatable.
	/// The built-in arnav.com table is served when none is given.
	#[clap(short, long = "record", value_name = "NAME,TYPE,VALUE")]
	pub records: Vec<ResourceRecord>,

	#[clap(long, default_value_t = 0)]
	pub a_ttl: u32,
	#[clap(long, default_value_t = 300)]
	pub cname_ttl: u32,

	/// SO_RCVBUF for the listening socket
	#[clap(long)]
	pub recv_buffer: Option<usize>,

	/// answer NXDOMAIN for unknown names instead of dropping the query
	#[clap(long)]
	pub negative_answers: bool,
	/// only answer A records to A/ANY queries
	#[clap(long)]
	pub strict_types: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let args = Args::parse();

	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let zone = if args.records.is_empty() {
		Zone::builtin()
	} else {
		match Zone::new(args.records) {
			Ok(z) => z,
			Err(e) => {
				error!("{e}");
				return ExitCode::FAILURE;
			}
		}
	};
	info!("serving {} records", zone.len());
	for rr in zone.records() {
		debug!("\t{rr}");
	}

	let policy = Policy {
		a_ttl: args.a_ttl,
		cname_ttl: args.cname_ttl,
		negative_answers: args.negative_answers,
		strict_types: args.strict_types,
	};

	let s = match listener::bind(args.listen, args.recv_buffer).await {
		Ok(s) => s,
		Err(e) => {
			error!("failed to bind {}: {e}", args.listen);
			return ExitCode::FAILURE;
		}
	};

	let local = task::LocalSet::new();
	let (abort_tx, abort) = oneshot::channel();

	local.spawn_local(async move {
		if let Err(e) = ctrl_c().await {
			error!("failed to listen for ctrl-c: {e}");
			return;
		}
		info!("ctrl-c received, shutting down");
		let _ = abort_tx.send(());
	});
	let server = local.spawn_local(listener::serve(s, Rc::new(zone), policy, abort));

	match local.run_until(server).await {
		Ok(Ok(())) => ExitCode::SUCCESS,
		Ok(Err(_)) => ExitCode::FAILURE,
		Err(e) => {
			error!("listener task failed: {e}");
			ExitCode::FAILURE
		}
	}
}
