use crate::error::JbodError;

const KIND_SHIFT: u32 = 12;
const BLOCK_SHIFT: u32 = 4;

/// Disk ids occupy the low 4 bits of a token.
pub const DISK_ID_MASK: u32 = 0x0F;

/// Block ids occupy 8 bits above the disk id.
pub const BLOCK_ID_MASK: u32 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CommandKind {
    Mount = 0x00,
    Unmount = 0x01,
    SeekToDisk = 0x02,
    SeekToBlock = 0x03,
    ReadBlock = 0x04,
    WriteBlock = 0x05,
    SignBlock = 0x06,
}

impl TryFrom<u32> for CommandKind {
    type Error = JbodError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0x00 => Ok(CommandKind::Mount),
            0x01 => Ok(CommandKind::Unmount),
            0x02 => Ok(CommandKind::SeekToDisk),
            0x03 => Ok(CommandKind::SeekToBlock),
            0x04 => Ok(CommandKind::ReadBlock),
            0x05 => Ok(CommandKind::WriteBlock),
            0x06 => Ok(CommandKind::SignBlock),
            _ => Err(JbodError::BadCmd),
        }
    }
}

/// A request to the JBOD device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Mount,
    Unmount,
    SeekToDisk(u8),
    SeekToBlock(u8),
    ReadBlock,
    WriteBlock,
    SignBlock,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Mount => CommandKind::Mount,
            Command::Unmount => CommandKind::Unmount,
            Command::SeekToDisk(_) => CommandKind::SeekToDisk,
            Command::SeekToBlock(_) => CommandKind::SeekToBlock,
            Command::ReadBlock => CommandKind::ReadBlock,
            Command::WriteBlock => CommandKind::WriteBlock,
            Command::SignBlock => CommandKind::SignBlock,
        }
    }

    /// Pack into the device token `kind << 12 | block << 4 | disk`.
    ///
    /// Operands wider than their field are masked, so disk ids keep only the
    /// low 4 bits.
    pub fn encode(&self) -> u32 {
        let (disk, block) = match *self {
            Command::SeekToDisk(disk) => (disk as u32, 0),
            Command::SeekToBlock(block) => (0, block as u32),
            _ => (0, 0),
        };
        ((self.kind() as u32) << KIND_SHIFT)
            | ((block & BLOCK_ID_MASK) << BLOCK_SHIFT)
            | (disk & DISK_ID_MASK)
    }

    pub fn decode(op: u32) -> Result<Self, JbodError> {
        let disk = (op & DISK_ID_MASK) as u8;
        let block = ((op >> BLOCK_SHIFT) & BLOCK_ID_MASK) as u8;
        let cmd = match CommandKind::try_from(op >> KIND_SHIFT)? {
            CommandKind::Mount => Command::Mount,
            CommandKind::Unmount => Command::Unmount,
            CommandKind::SeekToDisk => Command::SeekToDisk(disk),
            CommandKind::SeekToBlock => Command::SeekToBlock(block),
            CommandKind::ReadBlock => Command::ReadBlock,
            CommandKind::WriteBlock => Command::WriteBlock,
            CommandKind::SignBlock => Command::SignBlock,
        };
        Ok(cmd)
    }
}
