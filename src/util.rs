use zerocopy::{AsBytes, FromBytes, Unaligned};

pub const JBOD_NUM_DISKS: usize = 16;

/// Each disk is 65536 bytes (256 blocks * 256 bytes per block).
pub const JBOD_DISK_SIZE: usize = 65536;

pub const JBOD_BLOCK_SIZE: usize = 256;

pub const JBOD_NUM_BLOCKS_PER_DISK: usize = 256;

/// Largest number of bytes a single `Mdadm::read` may request.
pub const MAX_READ_LEN: u32 = 1024;

const _: () = assert!(JBOD_DISK_SIZE == JBOD_NUM_BLOCKS_PER_DISK * JBOD_BLOCK_SIZE);

/// A single device block as transferred by `ReadBlock`/`WriteBlock`.
pub type Block = [u8; JBOD_BLOCK_SIZE];

#[derive(Debug, AsBytes, FromBytes, Unaligned, PartialEq, Eq, Clone)]
#[repr(C)]
pub struct BlockMagic(pub [u8; 4]);

pub(crate) const CRC: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_CKSUM);

/// Shape of the disk array behind the linear address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub num_disks: usize,
    pub disk_size: usize,
    pub block_size: usize,
    pub blocks_per_disk: usize,
}

pub const JBOD_GEOMETRY: Geometry = Geometry {
    num_disks: JBOD_NUM_DISKS,
    disk_size: JBOD_DISK_SIZE,
    block_size: JBOD_BLOCK_SIZE,
    blocks_per_disk: JBOD_NUM_BLOCKS_PER_DISK,
};

/// Where a linear address lands inside the array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub disk: usize,
    pub block: usize,
    pub offset: usize,
}

impl Geometry {
    /// Total number of addressable bytes across every disk.
    pub const fn capacity(&self) -> usize {
        self.num_disks * self.disk_size
    }

    /// Split a linear address into disk, block and intra-block offset.
    ///
    /// The caller guarantees `addr < self.capacity()`.
    pub const fn locate(&self, addr: usize) -> Location {
        let addr_in_disk = addr % self.disk_size;
        Location {
            disk: addr / self.disk_size,
            block: addr_in_disk / self.block_size,
            offset: addr_in_disk % self.block_size,
        }
    }
}
