//! USB transport.
//!
//! Finds the keyboard by its fixed vendor/product ID, claims the configured
//! interface (detaching a bound kernel driver first) and exposes the two raw
//! endpoint transfers the protocol needs.

use std::time::Duration;

use log::{debug, info, warn};
use rusb::{Device, DeviceHandle, GlobalContext};
use strum::{Display, EnumString};

use crate::error::{CommandError, ConnectError};
use crate::frame::Frame;
use crate::sequencer::FrameTransport;

pub const VID_GMMK: u16 = 0x09da;
pub const PID_GMMK: u16 = 0x3735;

/// Default per-transfer timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Observed endpoint layouts for the `0x09da:0x3735` device.
///
/// Two captures of the same VID/PID disagree on addressing. Neither is known
/// to be authoritative, so the layout is selectable data rather than a
/// constant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[strum(serialize_all = "kebab-case")]
pub enum DeviceVariant {
    /// GMMK keyboard layout: endpoints `0x00`/`0x80` on interface 0.
    #[default]
    Gmmk,
    /// AL90 "Bloody" layout: endpoints `0x03`/`0x82` on interface 1.
    Al90Bloody,
}

impl DeviceVariant {
    pub fn endpoints(&self) -> EndpointConfig {
        match self {
            DeviceVariant::Gmmk => {
                EndpointConfig { command: 0x00, interrupt: 0x80, interface: 0 }
            },
            DeviceVariant::Al90Bloody => {
                EndpointConfig { command: 0x03, interrupt: 0x82, interface: 1 }
            },
        }
    }
}

/// Endpoint addresses and interface index for one device variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EndpointConfig {
    /// OUT command endpoint address.
    pub command: u8,
    /// IN interrupt endpoint address.
    pub interrupt: u8,
    /// Interface index holding both endpoints.
    pub interface: u8,
}

/// The teardown half of the USB surface, separated from the handle so the
/// release bookkeeping runs against a mock in tests.
trait InterfaceOps {
    fn release_interface(&mut self, interface: u8) -> Result<(), ConnectError>;
    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), ConnectError>;
}

impl InterfaceOps for DeviceHandle<GlobalContext> {
    fn release_interface(&mut self, interface: u8) -> Result<(), ConnectError> {
        Ok(DeviceHandle::release_interface(self, interface)?)
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> Result<(), ConnectError> {
        Ok(DeviceHandle::attach_kernel_driver(self, interface)?)
    }
}

/// Claim-state bookkeeping: whether the interface is still held and whether a
/// kernel driver was displaced to claim it.
struct InterfaceGuard {
    interface: u8,
    detached_kernel_driver: bool,
    claimed: bool,
}

impl InterfaceGuard {
    /// Release the interface, reattaching the kernel driver iff it was
    /// detached at claim time. A second call is a no-op.
    fn release(&mut self, ops: &mut impl InterfaceOps) -> Result<(), ConnectError> {
        if !self.claimed {
            return Ok(());
        }
        self.claimed = false;

        ops.release_interface(self.interface)?;

        if self.detached_kernel_driver {
            debug!("Reattaching kernel driver to interface {}", self.interface);
            ops.attach_kernel_driver(self.interface)?;
        }

        Ok(())
    }
}

/// An open device with its interface claimed.
///
/// The handle is exclusively owned; a second instance targeting the same
/// physical device fails at claim time. Transfers are strictly sequential.
pub struct UsbTransport {
    handle: DeviceHandle<GlobalContext>,
    endpoints: EndpointConfig,
    timeout: Duration,
    guard: InterfaceGuard,
}

impl UsbTransport {
    /// Open the keyboard and claim its interface.
    ///
    /// A kernel driver bound to the interface is detached first and the fact
    /// recorded, so [`UsbTransport::release`] can restore it.
    pub fn open(variant: DeviceVariant, timeout: Duration) -> Result<Self, ConnectError> {
        let device = find_device()?;
        info!(
            "Connected to device at bus {:03} address {:03} ({variant})",
            device.bus_number(),
            device.address()
        );

        let handle = device.open()?;
        let endpoints = variant.endpoints();

        let mut detached_kernel_driver = false;
        if handle.kernel_driver_active(endpoints.interface).unwrap_or(false) {
            debug!("Detaching kernel driver from interface {}", endpoints.interface);
            if handle.detach_kernel_driver(endpoints.interface).is_err() {
                return Err(ConnectError::ClaimFailed(endpoints.interface));
            }
            detached_kernel_driver = true;
        }

        if handle.claim_interface(endpoints.interface).is_err() {
            // Leave the interface as we found it before bailing.
            if detached_kernel_driver {
                let _ = handle.attach_kernel_driver(endpoints.interface);
            }
            return Err(ConnectError::ClaimFailed(endpoints.interface));
        }

        let guard = InterfaceGuard {
            interface: endpoints.interface,
            detached_kernel_driver,
            claimed: true,
        };
        Ok(Self { handle, endpoints, timeout, guard })
    }

    /// Release the interface, reattaching the kernel driver iff we detached
    /// it. Idempotent; also runs on drop.
    pub fn release(&mut self) -> Result<(), ConnectError> {
        self.guard.release(&mut self.handle)
    }
}

impl FrameTransport for UsbTransport {
    fn write(&mut self, frame: &Frame) -> Result<usize, CommandError> {
        let written =
            self.handle
                .write_interrupt(self.endpoints.command, frame.as_bytes(), self.timeout)?;
        Ok(written)
    }

    fn read(&mut self, len: usize) -> Result<Vec<u8>, CommandError> {
        let mut buf = vec![0; len];
        let received =
            self.handle
                .read_interrupt(self.endpoints.interrupt, &mut buf, self.timeout)?;
        buf.truncate(received);
        Ok(buf)
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        if let Err(error) = self.release() {
            warn!("Failed to release interface on drop: {error}");
        }
    }
}

/// Locate the keyboard by its fixed vendor/product ID.
fn find_device() -> Result<Device<GlobalContext>, ConnectError> {
    for device in rusb::devices()?.iter() {
        if let Ok(descriptor) = device.device_descriptor() {
            if descriptor.vendor_id() == VID_GMMK && descriptor.product_id() == PID_GMMK {
                return Ok(device);
            }
        }
    }

    Err(ConnectError::DeviceNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_observed_endpoints() {
        let gmmk = DeviceVariant::Gmmk.endpoints();
        assert_eq!((gmmk.command, gmmk.interrupt, gmmk.interface), (0x00, 0x80, 0));

        let bloody = DeviceVariant::Al90Bloody.endpoints();
        assert_eq!((bloody.command, bloody.interrupt, bloody.interface), (0x03, 0x82, 1));
    }

    #[test]
    fn variant_names_round_trip() {
        assert_eq!("gmmk".parse::<DeviceVariant>().unwrap(), DeviceVariant::Gmmk);
        assert_eq!("al90-bloody".parse::<DeviceVariant>().unwrap(), DeviceVariant::Al90Bloody);
        assert_eq!(DeviceVariant::Al90Bloody.to_string(), "al90-bloody");
    }

    #[derive(Default)]
    struct MockOps {
        releases: usize,
        attaches: usize,
    }

    impl InterfaceOps for MockOps {
        fn release_interface(&mut self, _interface: u8) -> Result<(), ConnectError> {
            self.releases += 1;
            Ok(())
        }

        fn attach_kernel_driver(&mut self, _interface: u8) -> Result<(), ConnectError> {
            self.attaches += 1;
            Ok(())
        }
    }

    #[test]
    fn double_release_runs_the_teardown_once() {
        let mut ops = MockOps::default();
        let mut guard =
            InterfaceGuard { interface: 1, detached_kernel_driver: true, claimed: true };

        guard.release(&mut ops).unwrap();
        guard.release(&mut ops).unwrap();

        assert_eq!(ops.releases, 1);
        assert_eq!(ops.attaches, 1);
    }

    #[test]
    fn release_skips_reattach_when_no_driver_was_detached() {
        let mut ops = MockOps::default();
        let mut guard =
            InterfaceGuard { interface: 0, detached_kernel_driver: false, claimed: true };

        guard.release(&mut ops).unwrap();

        assert_eq!(ops.releases, 1);
        assert_eq!(ops.attaches, 0);
    }
}
