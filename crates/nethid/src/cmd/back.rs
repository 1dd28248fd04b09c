use nethid_device::HidrawDevice;
use nethid_frame::FrameConfig;
use nethid_peer::{Mediator, MediatorConfig};
use nethid_transport::{signal, Channel};
use tracing::info;

use crate::cmd::BackArgs;
use crate::exit::{session_end, CliError, CliResult};

pub fn run(args: BackArgs) -> CliResult<i32> {
    signal::install().map_err(|err| CliError::failed("sigaction", err))?;

    let device = HidrawDevice::open(&args.path).map_err(|err| CliError::failed("open", err))?;
    let (inbound, outbound) = Channel::stdio()
        .map_err(|err| CliError::failed("adopt_channel", err))?
        .into_split();

    let config = MediatorConfig {
        initial_buffer_capacity: args.buffer_size,
        frame: FrameConfig {
            max_request_payload: args.max_request_payload,
        },
    };
    let mut mediator = Mediator::with_config(device, inbound, outbound, config)
        .map_err(|err| CliError::failed("resize_buffer", err))?;

    info!(path = %args.path.display(), "back side ready");
    let end = mediator
        .run(signal::flag())
        .map_err(|err| CliError::failed("handle_message", err))?;
    Ok(session_end(end))
}
