use crate::board::Board;

/// `end_transmission` status: success
pub const TX_OK: u8 = 0;
/// `end_transmission` status: no device acknowledged the address
pub const TX_ADDRESS_NACK: u8 = 2;

/// Bus master side of the two-wire bus
pub struct Wire<'a> {
    board: &'a mut Board,
}

impl<'a> Wire<'a> {
    pub(crate) fn new(board: &'a mut Board) -> Self {
        Self { board }
    }

    pub fn begin(&mut self) {
        tracing::trace!("wire: begin as master");
    }

    pub fn begin_transmission(&mut self, address: u8) {
        self.board.bus_begin(address);
    }

    /// Queue one byte; returns the number of bytes written
    pub fn write(&mut self, byte: u8) -> usize {
        self.board.bus_write(byte);
        1
    }

    pub fn end_transmission(&mut self) -> u8 {
        let acked = self.board.bus().target().is_some();
        self.board.bus_end();
        if acked { TX_OK } else { TX_ADDRESS_NACK }
    }
}
