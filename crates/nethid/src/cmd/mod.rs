use clap::{Args, Subcommand};
use std::os::fd::RawFd;
use std::path::PathBuf;

use nethid_device::DEFAULT_UHID_PATH;
use nethid_frame::DEFAULT_MAX_REQUEST_PAYLOAD;
use nethid_transport::{DEFAULT_BUFFER_CAPACITY, FRONT_FD_IN, FRONT_FD_OUT};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod back;
pub mod front;
pub mod probe;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve a real hidraw device over stdin/stdout.
    Back(BackArgs),
    /// Present the remote device as a local uhid device.
    Front(FrontArgs),
    /// Query a back side and print what it reports.
    Probe(ProbeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Back(args) => back::run(args),
        Command::Front(args) => front::run(args),
        Command::Probe(args) => probe::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct BackArgs {
    /// hidraw device node (e.g. /dev/hidraw0).
    pub path: PathBuf,
    /// Initial working buffer size; an input report that fills it is rejected.
    #[arg(long, default_value_t = DEFAULT_BUFFER_CAPACITY, env = "NETHID_BUFFER_SIZE")]
    pub buffer_size: usize,
    /// Largest request payload accepted from the front side.
    #[arg(long, default_value_t = DEFAULT_MAX_REQUEST_PAYLOAD, env = "NETHID_MAX_REQUEST_PAYLOAD")]
    pub max_request_payload: usize,
}

#[derive(Args, Debug)]
pub struct FrontArgs {
    /// uhid control node.
    #[arg(long, default_value = DEFAULT_UHID_PATH, env = "NETHID_UHID_PATH")]
    pub uhid: PathBuf,
    /// Inherited descriptor responses are read from.
    #[arg(long, default_value_t = FRONT_FD_IN, env = "NETHID_FD_IN")]
    pub fd_in: RawFd,
    /// Inherited descriptor requests are written to.
    #[arg(long, default_value_t = FRONT_FD_OUT, env = "NETHID_FD_OUT")]
    pub fd_out: RawFd,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Inherited descriptor responses are read from.
    #[arg(long, default_value_t = FRONT_FD_IN, env = "NETHID_FD_IN")]
    pub fd_in: RawFd,
    /// Inherited descriptor requests are written to.
    #[arg(long, default_value_t = FRONT_FD_OUT, env = "NETHID_FD_OUT")]
    pub fd_out: RawFd,
    /// Also fetch this feature report (repeatable).
    #[arg(long, value_name = "REPORT_NUMBER")]
    pub feature: Vec<u8>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
