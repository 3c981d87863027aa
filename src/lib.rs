//! Linear address translation over a JBOD disk array.
//!
//! [`Mdadm`] exposes sixteen 64 KiB disks as one flat 1 MiB byte range and
//! turns reads against that range into seek/read commands for a
//! [`JbodDevice`]. [`JbodSim`] is an in-memory device for tests and tools.
#![no_std]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

mod command;
mod device;
mod error;
mod mdadm;
mod sim;
mod util;

#[cfg(test)]
mod tests_util;

pub use command::{Command, CommandKind, BLOCK_ID_MASK, DISK_ID_MASK};
pub use device::{Jbod, JbodDevice};
pub use error::{ErrorKind, JbodError};
pub use mdadm::Mdadm;
pub use sim::{BlockSignature, JbodSim};
pub use util::{
    Block, Geometry, Location, JBOD_BLOCK_SIZE, JBOD_DISK_SIZE, JBOD_GEOMETRY,
    JBOD_NUM_BLOCKS_PER_DISK, JBOD_NUM_DISKS, MAX_READ_LEN,
};
