use alloc::vec;
use alloc::vec::Vec;
use log::{debug, info, trace, warn};
use zerocopy::{AsBytes, FromBytes, LayoutVerified, Unaligned};

use crate::command::{Command, CommandKind};
use crate::device::JbodDevice;
use crate::error::JbodError;
use crate::util::{
    Block, BlockMagic, Geometry, CRC, JBOD_BLOCK_SIZE, JBOD_DISK_SIZE, JBOD_GEOMETRY,
    JBOD_NUM_BLOCKS_PER_DISK, JBOD_NUM_DISKS,
};

const SIGNATURE_MAGIC: BlockMagic = BlockMagic(*b"SIGN");

/// Written to the start of the caller's buffer by `SignBlock`.
#[derive(Debug, AsBytes, FromBytes, Unaligned, Clone)]
#[repr(C)]
pub struct BlockSignature {
    magic: BlockMagic,
    disk: u8,
    block: u8,
    reserved: [u8; 2],
    crc: [u8; 4],
}

impl BlockSignature {
    fn new(disk: usize, block: usize, contents: &[u8]) -> Self {
        BlockSignature {
            magic: SIGNATURE_MAGIC,
            disk: disk as u8,
            block: block as u8,
            reserved: [0u8; 2],
            crc: CRC.checksum(contents).to_le_bytes(),
        }
    }

    /// Parse a signature from the front of a signed block buffer.
    pub fn try_from_bytes(bytes: &[u8]) -> Option<Self> {
        let (sig, _) = LayoutVerified::<_, BlockSignature>::new_unaligned_from_prefix(bytes)?;
        if sig.magic != SIGNATURE_MAGIC {
            return None;
        }
        Some((*sig).clone())
    }

    pub fn disk(&self) -> usize {
        self.disk as usize
    }

    pub fn block(&self) -> usize {
        self.block as usize
    }

    pub fn crc(&self) -> u32 {
        u32::from_le_bytes(self.crc)
    }

    /// True when `contents` still checksums to the signed value.
    pub fn matches(&self, contents: &[u8]) -> bool {
        CRC.checksum(contents) == self.crc()
    }
}

struct Fault {
    kind: CommandKind,
    remaining: usize,
    error: JbodError,
}

/// In-memory JBOD array.
///
/// Mirrors a physical JBOD controller: a mount gate, a current disk and a
/// current block that advances after every block transfer.
pub struct JbodSim {
    data: Vec<u8>,
    mounted: bool,
    cur_disk: usize,
    cur_block: usize,
    last_error: Option<JbodError>,
    history: Vec<Command>,
    faults: Vec<Fault>,
}

impl Default for JbodSim {
    fn default() -> Self {
        Self::new()
    }
}

impl JbodSim {
    /// A zero-filled, unmounted array.
    pub fn new() -> Self {
        JbodSim {
            data: vec![0u8; JBOD_GEOMETRY.capacity()],
            mounted: false,
            cur_disk: 0,
            cur_block: 0,
            last_error: None,
            history: Vec::new(),
            faults: Vec::new(),
        }
    }

    /// An array whose first `image.len()` bytes come from a flat image.
    pub fn from_image(image: &[u8]) -> Result<Self, JbodError> {
        let mut sim = Self::new();
        sim.load(0, image)?;
        Ok(sim)
    }

    /// Copy `bytes` directly into the array at a linear address, bypassing
    /// the command interface.
    pub fn load(&mut self, addr: usize, bytes: &[u8]) -> Result<(), JbodError> {
        let end = addr.checked_add(bytes.len()).ok_or(JbodError::BadWrite)?;
        if end > self.data.len() {
            warn!(
                "image of {} bytes at 0x{:x} exceeds array capacity {}",
                bytes.len(),
                addr,
                self.data.len()
            );
            return Err(JbodError::BadWrite);
        }
        self.data[addr..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Raw view of the whole array in linear order.
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    pub fn geometry(&self) -> Geometry {
        JBOD_GEOMETRY
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Error from the most recent failed operation, like a device errno.
    pub fn last_error(&self) -> Option<JbodError> {
        self.last_error
    }

    /// Every command decoded so far, in order.
    pub fn history(&self) -> &[Command] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Make a future command of `kind` fail with `error` after `skip`
    /// matching commands have gone through.
    pub fn fail_after(&mut self, kind: CommandKind, skip: usize, error: JbodError) {
        self.faults.push(Fault {
            kind,
            remaining: skip,
            error,
        });
    }

    fn injected_fault(&mut self, kind: CommandKind) -> Option<JbodError> {
        let mut hit = None;
        self.faults.retain_mut(|fault| {
            if fault.kind != kind || hit.is_some() {
                return true;
            }
            if fault.remaining == 0 {
                hit = Some(fault.error);
                return false;
            }
            fault.remaining -= 1;
            true
        });
        hit
    }

    fn require_mounted(&self) -> Result<(), JbodError> {
        if self.mounted {
            Ok(())
        } else {
            Err(JbodError::Unmounted)
        }
    }

    fn block_range(&self) -> Result<core::ops::Range<usize>, JbodError> {
        if self.cur_block >= JBOD_NUM_BLOCKS_PER_DISK {
            return Err(JbodError::BadBlockNum);
        }
        let start = self.cur_disk * JBOD_DISK_SIZE + self.cur_block * JBOD_BLOCK_SIZE;
        Ok(start..start + JBOD_BLOCK_SIZE)
    }

    fn run(&mut self, cmd: Command, block: Option<&mut Block>) -> Result<(), JbodError> {
        if let Some(err) = self.injected_fault(cmd.kind()) {
            debug!("injected fault on {:?}: {}", cmd, err);
            return Err(err);
        }

        match cmd {
            Command::Mount => {
                if self.mounted {
                    return Err(JbodError::AlreadyMounted);
                }
                self.mounted = true;
                info!("jbod mounted");
            }
            Command::Unmount => {
                if !self.mounted {
                    return Err(JbodError::AlreadyUnmounted);
                }
                self.mounted = false;
                info!("jbod unmounted");
            }
            Command::SeekToDisk(disk) => {
                self.require_mounted()?;
                if disk as usize >= JBOD_NUM_DISKS {
                    return Err(JbodError::BadDiskNum);
                }
                self.cur_disk = disk as usize;
            }
            Command::SeekToBlock(id) => {
                self.require_mounted()?;
                if id as usize >= JBOD_NUM_BLOCKS_PER_DISK {
                    return Err(JbodError::BadBlockNum);
                }
                self.cur_block = id as usize;
            }
            Command::ReadBlock => {
                self.require_mounted()?;
                let buf = block.ok_or(JbodError::BadRead)?;
                let range = self.block_range()?;
                buf.copy_from_slice(&self.data[range]);
                self.cur_block += 1;
            }
            Command::WriteBlock => {
                self.require_mounted()?;
                let buf = block.ok_or(JbodError::BadWrite)?;
                let range = self.block_range()?;
                self.data[range].copy_from_slice(&buf[..]);
                self.cur_block += 1;
            }
            Command::SignBlock => {
                self.require_mounted()?;
                let buf = block.ok_or(JbodError::BadRead)?;
                let range = self.block_range()?;
                let sig = BlockSignature::new(self.cur_disk, self.cur_block, &self.data[range]);
                let sig = sig.as_bytes();
                buf.fill(0);
                buf[..sig.len()].copy_from_slice(sig);
            }
        }
        Ok(())
    }
}

impl JbodDevice for JbodSim {
    fn operation(&mut self, op: u32, block: Option<&mut Block>) -> Result<(), JbodError> {
        let result = Command::decode(op).and_then(|cmd| {
            trace!(
                "sim {:?} disk: {} block: {}",
                cmd,
                self.cur_disk,
                self.cur_block
            );
            self.history.push(cmd);
            self.run(cmd, block)
        });
        if let Err(e) = result {
            self.last_error = Some(e);
        }
        result
    }
}
