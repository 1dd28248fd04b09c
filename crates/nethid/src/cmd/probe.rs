use nethid_device::display_name;
use nethid_peer::RemoteDevice;
use nethid_transport::Channel;
use serde::Serialize;

use crate::cmd::ProbeArgs;
use crate::exit::{CliError, CliResult, SUCCESS};
use crate::output::{hex, key_value_table, print_raw, OutputFormat};

#[derive(Serialize)]
struct FeatureOutput {
    report_number: u8,
    len: usize,
    data: String,
}

#[derive(Serialize)]
struct ProbeOutput {
    bus_type: i32,
    vendor: String,
    product: String,
    name: String,
    report_descriptor_len: usize,
    report_descriptor: String,
    features: Vec<FeatureOutput>,
}

pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let (inbound, outbound) = Channel::from_raw_fds(args.fd_in, args.fd_out)
        .map_err(|err| CliError::failed("adopt_channel", err))?
        .into_split();
    let mut remote =
        RemoteDevice::new(inbound, outbound).map_err(|err| CliError::failed("resize_buffer", err))?;

    let identity = remote
        .fetch_identity()
        .map_err(|err| CliError::failed("fetch_identity", err))?;
    let name = remote
        .fetch_name()
        .map_err(|err| CliError::failed("fetch_name", err))?;
    let descriptor = remote
        .fetch_report_descriptor()
        .map_err(|err| CliError::failed("fetch_report_descriptor", err))?;

    let mut features = Vec::with_capacity(args.feature.len());
    for report_number in args.feature {
        let data = remote
            .fetch_feature_report(report_number)
            .map_err(|err| CliError::failed("fetch_feature_report", err))?;
        features.push(FeatureOutput {
            report_number,
            len: data.len(),
            data: hex(data),
        });
    }

    if format == OutputFormat::Raw {
        print_raw(&descriptor);
        return Ok(SUCCESS);
    }

    let out = ProbeOutput {
        bus_type: identity.bus_type,
        vendor: format!("{:04x}", identity.vendor),
        product: format!("{:04x}", identity.product),
        name: display_name(&name),
        report_descriptor_len: descriptor.len(),
        report_descriptor: hex(&descriptor),
        features,
    };
    print_probe(&out, format);
    Ok(SUCCESS)
}

fn print_probe(out: &ProbeOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut rows = vec![
                ("bus", format!("{:#04x}", out.bus_type)),
                ("vendor", out.vendor.clone()),
                ("product", out.product.clone()),
                ("name", out.name.clone()),
                (
                    "descriptor",
                    format!("{} bytes", out.report_descriptor_len),
                ),
            ];
            for feature in &out.features {
                rows.push(("feature", format!("{}: {}", feature.report_number, feature.data)));
            }
            println!("{}", key_value_table(&rows));
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!("Device:");
            println!("  Bus:              {:#04x}", out.bus_type);
            println!("  Vendor:Product:   {}:{}", out.vendor, out.product);
            println!("  Name:             {}", out.name);
            println!("  Descriptor:       {} bytes", out.report_descriptor_len);
            println!("                    {}", out.report_descriptor);
            for feature in &out.features {
                println!(
                    "  Feature {:<3}      {} bytes: {}",
                    feature.report_number, feature.len, feature.data
                );
            }
        }
    }
}
