//! Machine (instance) discriminator resolution
//!
//! Resolved once at startup. Order of precedence:
//! 1. `ID_MACHINE_ID` environment variable
//! 2. Lower 16 bits of the first private IPv4 address of this host

use crate::error::{IdError, IdResult};
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, info};

pub const MACHINE_ID_ENV: &str = "ID_MACHINE_ID";

/// Resolve the discriminator for this process.
pub fn resolve_machine_id() -> IdResult<u16> {
    match std::env::var(MACHINE_ID_ENV) {
        Ok(raw) => {
            let id = parse_machine_id(&raw)?;
            info!(machine_id = id, source = "env", "Resolved id generator machine id");
            Ok(id)
        }
        Err(_) => {
            let id = machine_id_from_private_ip()?;
            info!(machine_id = id, source = "private_ip", "Resolved id generator machine id");
            Ok(id)
        }
    }
}

pub fn parse_machine_id(raw: &str) -> IdResult<u16> {
    raw.trim().parse::<u16>().map_err(|e| {
        IdError::MachineIdUnavailable(format!("{}={:?} is not a u16: {}", MACHINE_ID_ENV, raw, e))
    })
}

fn machine_id_from_private_ip() -> IdResult<u16> {
    let interfaces = if_addrs::get_if_addrs()
        .map_err(|e| IdError::MachineIdUnavailable(format!("listing interfaces: {}", e)))?;

    for iface in interfaces {
        if let IpAddr::V4(addr) = iface.ip() {
            if is_private_ipv4(&addr) {
                debug!(interface = %iface.name, address = %addr, "Using private address for machine id");
                return Ok(lower_16_bits(&addr));
            }
        }
    }

    Err(IdError::MachineIdUnavailable(
        "no private IPv4 address found and ID_MACHINE_ID not set".to_string(),
    ))
}

/// 10/8, 172.16/12 and 192.168/16
fn is_private_ipv4(addr: &Ipv4Addr) -> bool {
    let o = addr.octets();
    o[0] == 10 || (o[0] == 172 && (16..32).contains(&o[1])) || (o[0] == 192 && o[1] == 168)
}

fn lower_16_bits(addr: &Ipv4Addr) -> u16 {
    let o = addr.octets();
    u16::from(o[2]) << 8 | u16::from(o[3])
}
