// src/board.rs - Peripheral registry, pin table and bus routing
use crate::assets::AssetSet;
use crate::bus::Bus;
use crate::error::{SimError, SimResult};
use crate::geometry::Point;
use crate::peripheral::{Peripheral, PeripheralState};
use crate::platform::Canvas;

/// Digital pins 0-13 plus analog pins A0-A5 (14-19)
pub const PIN_COUNT: usize = 20;

/// Owns every peripheral for the lifetime of a simulation.
///
/// Peripherals live in an append-only arena; the pin table and the bus
/// address table refer to them by slot index. Once sealed, the arena is
/// never resized.
pub struct Board {
    peripherals: Vec<Box<dyn Peripheral>>,
    pins: [Option<usize>; PIN_COUNT],
    bus: Bus,
    sealed: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            peripherals: Vec::new(),
            pins: [None; PIN_COUNT],
            bus: Bus::new(),
            sealed: false,
        }
    }

    /// Take ownership of `peripheral` and route every pin in `pins` to it.
    /// Returns the slot index of the new peripheral.
    pub fn connect(&mut self, peripheral: Box<dyn Peripheral>, pins: &[u8]) -> SimResult<usize> {
        if self.sealed {
            return Err(SimError::BoardSealed);
        }
        if let Some(&bad) = pins.iter().find(|&&p| p as usize >= PIN_COUNT) {
            return Err(SimError::PinOutOfRange(bad));
        }

        let slot = self.peripherals.len();
        for &pin in pins {
            if let Some(prev) = self.pins[pin as usize].replace(slot) {
                tracing::warn!(
                    "pin {} re-assigned from {} (slot {}) to {} (slot {})",
                    pin,
                    self.peripherals[prev].kind(),
                    prev,
                    peripheral.kind(),
                    slot
                );
            }
        }
        tracing::debug!("connected {} in slot {} on pins {:?}", peripheral.kind(), slot, pins);
        self.peripherals.push(peripheral);
        Ok(slot)
    }

    /// Slot of the peripheral owning `pin`
    pub fn resolve(&self, pin: u8) -> SimResult<usize> {
        self.pins
            .get(pin as usize)
            .copied()
            .ok_or(SimError::PinOutOfRange(pin))?
            .ok_or(SimError::UnassignedPin(pin))
    }

    pub fn digital_read(&self, pin: u8) -> SimResult<u8> {
        let slot = self.resolve(pin)?;
        Ok(self.peripherals[slot].digital_read(pin))
    }

    pub fn digital_write(&mut self, pin: u8, value: u8) -> SimResult<()> {
        let slot = self.resolve(pin)?;
        self.peripherals[slot].digital_write(pin, value);
        Ok(())
    }

    pub fn analog_read(&self, pin: u8) -> SimResult<u16> {
        let slot = self.resolve(pin)?;
        Ok(self.peripherals[slot].analog_read(pin))
    }

    pub fn analog_write(&mut self, pin: u8, value: u8) -> SimResult<()> {
        let slot = self.resolve(pin)?;
        self.peripherals[slot].analog_write(pin, value);
        Ok(())
    }

    /// Make the peripheral in `slot` the byte sink for `address`
    pub fn register_bus_device(&mut self, address: u8, slot: usize) {
        self.bus.register(address, slot);
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_begin(&mut self, address: u8) {
        match self.bus.begin(address) {
            Some(slot) => self.peripherals[slot].bus_begin(),
            None => tracing::trace!("bus: no device at 0x{:02x}", address),
        }
    }

    pub fn bus_write(&mut self, byte: u8) {
        match self.bus.target() {
            Some(slot) => self.peripherals[slot].bus_write(byte),
            None => tracing::trace!("bus: dropped byte 0x{:02x}", byte),
        }
    }

    pub fn bus_end(&mut self) {
        self.bus.end();
    }

    pub fn broadcast_click(&mut self, pos: Point, pressed: bool) {
        for p in &mut self.peripherals {
            p.pointer_click(pos, pressed);
        }
    }

    pub fn broadcast_scroll(&mut self, pos: Point, up: bool) {
        for p in &mut self.peripherals {
            p.pointer_scroll(pos, up);
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas, assets: &AssetSet) {
        for p in &self.peripherals {
            p.render(canvas, assets);
        }
    }

    pub fn snapshot(&self) -> Vec<PeripheralState> {
        self.peripherals.iter().map(|p| p.snapshot()).collect()
    }

    pub fn peripheral(&self, slot: usize) -> Option<&dyn Peripheral> {
        self.peripherals.get(slot).map(|p| p.as_ref())
    }

    /// Freeze the peripheral collection
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.peripherals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peripherals.is_empty()
    }
}
