use crate::command::Command;
use crate::error::JbodError;
use crate::util::Block;
use log::{trace, warn};

/// Raw interface of a JBOD device.
///
/// `op` is a packed command token (see [`Command::encode`]). Commands that move
/// data use `block`; the rest ignore it.
pub trait JbodDevice {
    fn operation(&mut self, op: u32, block: Option<&mut Block>) -> Result<(), JbodError>;
}

impl<T: JbodDevice + ?Sized> JbodDevice for &mut T {
    fn operation(&mut self, op: u32, block: Option<&mut Block>) -> Result<(), JbodError> {
        (**self).operation(op, block)
    }
}

/// Typed front end over a [`JbodDevice`]. Token packing happens here and
/// nowhere else in the translator.
pub struct Jbod<D: JbodDevice> {
    device: D,
}

impl<D: JbodDevice> Jbod<D> {
    pub fn new(device: D) -> Self {
        Jbod { device }
    }

    pub fn execute(&mut self, cmd: Command, block: Option<&mut Block>) -> Result<(), JbodError> {
        let op = cmd.encode();
        trace!("jbod op: {:?} token: 0x{:05x}", cmd, op);
        self.device.operation(op, block).map_err(|e| {
            warn!("jbod op {:?} failed: {} (errno {})", cmd, e, e.code());
            e
        })
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}
