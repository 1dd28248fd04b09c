use nethid_device::UhidDevice;
use nethid_peer::{Emulator, RemoteDevice};
use nethid_transport::{signal, Channel};

use crate::cmd::FrontArgs;
use crate::exit::{session_end, CliError, CliResult};

pub fn run(args: FrontArgs) -> CliResult<i32> {
    signal::install().map_err(|err| CliError::failed("sigaction", err))?;

    let (inbound, outbound) = Channel::from_raw_fds(args.fd_in, args.fd_out)
        .map_err(|err| CliError::failed("adopt_channel", err))?
        .into_split();
    let device = UhidDevice::open(&args.uhid).map_err(|err| CliError::failed("open", err))?;
    let remote =
        RemoteDevice::new(inbound, outbound).map_err(|err| CliError::failed("resize_buffer", err))?;

    let mut emulator = Emulator::new(device, remote);
    let end = emulator
        .run(signal::flag())
        .map_err(|err| CliError::failed("run_device", err))?;
    Ok(session_end(end))
}
