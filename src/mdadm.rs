use log::{debug, info, trace};

use crate::command::{Command, BLOCK_ID_MASK, DISK_ID_MASK};
use crate::device::{Jbod, JbodDevice};
use crate::error::ErrorKind;
use crate::util::{Geometry, JBOD_BLOCK_SIZE, JBOD_GEOMETRY, MAX_READ_LEN};

/// Linear address translator over a JBOD array.
///
/// Presents the disks as one flat byte range of `num_disks * disk_size`
/// bytes. Every read re-seeks the disk and block it needs; nothing is cached
/// between calls.
pub struct Mdadm<D: JbodDevice> {
    jbod: Jbod<D>,
    geometry: Geometry,
    mounted: bool,
}

impl<D: JbodDevice> Mdadm<D> {
    pub fn new(device: D) -> Self {
        Mdadm {
            jbod: Jbod::new(device),
            geometry: JBOD_GEOMETRY,
            mounted: false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn device(&self) -> &D {
        self.jbod.device()
    }

    pub fn device_mut(&mut self) -> &mut D {
        self.jbod.device_mut()
    }

    pub fn into_inner(self) -> D {
        self.jbod.into_inner()
    }

    pub fn mount(&mut self) -> Result<(), ErrorKind> {
        if self.mounted {
            return Err(ErrorKind::AlreadyMounted);
        }
        self.jbod.execute(Command::Mount, None)?;
        self.mounted = true;
        info!("mdadm mounted");
        Ok(())
    }

    pub fn unmount(&mut self) -> Result<(), ErrorKind> {
        if !self.mounted {
            return Err(ErrorKind::AlreadyUnmounted);
        }
        self.jbod.execute(Command::Unmount, None)?;
        self.mounted = false;
        info!("mdadm unmounted");
        Ok(())
    }

    /// Read `len` bytes starting at linear address `start` into `buf`.
    ///
    /// Requests are split at block boundaries; each piece is a seek to disk,
    /// a seek to block and one block read. If the device fails part way
    /// through, `buf[..n]` holds the pieces already read and the rest of
    /// `buf` is left as it was.
    pub fn read(
        &mut self,
        start: u32,
        len: u32,
        buf: Option<&mut [u8]>,
    ) -> Result<usize, ErrorKind> {
        if !self.mounted {
            return Err(ErrorKind::Unmounted);
        }
        if len > MAX_READ_LEN {
            return Err(ErrorKind::LengthExceeded);
        }
        let len = len as usize;
        let buf = match buf {
            Some(buf) if buf.len() < len => return Err(ErrorKind::BufferTooSmall),
            None if len > 0 => return Err(ErrorKind::NullBuffer),
            buf => buf,
        };
        let end = start.checked_add(len as u32).ok_or(ErrorKind::RangeInvalid)?;
        if end as usize > self.geometry.capacity() {
            return Err(ErrorKind::RangeInvalid);
        }
        // Only a zero-length read gets this far without a buffer.
        let buf = match buf {
            Some(buf) => buf,
            None => return Ok(0),
        };
        debug!("mdadm rd start: 0x{:x} len: {}", start, len);

        let mut pos = 0;
        let mut block = [0u8; JBOD_BLOCK_SIZE];
        while pos < len {
            let loc = self.geometry.locate(start as usize + pos);
            let num_bytes = core::cmp::min(self.geometry.block_size - loc.offset, len - pos);
            trace!(
                "rd disk: {} block: {} offset: {} num_bytes: {}",
                loc.disk,
                loc.block,
                loc.offset,
                num_bytes
            );

            let disk = (loc.disk as u32 & DISK_ID_MASK) as u8;
            let block_id = (loc.block as u32 & BLOCK_ID_MASK) as u8;
            self.jbod.execute(Command::SeekToDisk(disk), None)?;
            self.jbod.execute(Command::SeekToBlock(block_id), None)?;
            self.jbod.execute(Command::ReadBlock, Some(&mut block))?;

            let chunk = &block[loc.offset..loc.offset + num_bytes];
            buf[pos..pos + num_bytes].copy_from_slice(chunk);
            pos += num_bytes;
        }

        Ok(pos)
    }
}
