//! Two-wire serial bus emulation.
//!
//! Maps bus addresses to the board slot of the device that sinks bytes sent
//! to that address, and tracks which device is addressed between the start
//! and end of a transmission. Delivery itself happens in the board, which
//! owns the devices.

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct Bus {
    devices: HashMap<u8, usize>,
    /// Address of the open transmission, if any
    current: Option<u8>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a device slot to `address`. Re-registering an address replaces
    /// the previous device; the replaced slot is returned.
    pub fn register(&mut self, address: u8, slot: usize) -> Option<usize> {
        let previous = self.devices.insert(address, slot);
        if let Some(prev) = previous {
            tracing::trace!("bus address 0x{:02x} moved from slot {} to {}", address, prev, slot);
        }
        previous
    }

    pub fn device(&self, address: u8) -> Option<usize> {
        self.devices.get(&address).copied()
    }

    /// Open a transmission to `address`, returning the addressed slot
    pub fn begin(&mut self, address: u8) -> Option<usize> {
        self.current = Some(address);
        self.device(address)
    }

    /// Slot receiving bytes of the open transmission
    pub fn target(&self) -> Option<usize> {
        self.current.and_then(|addr| self.device(addr))
    }

    pub fn current_address(&self) -> Option<u8> {
        self.current
    }

    pub fn end(&mut self) {
        self.current = None;
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
