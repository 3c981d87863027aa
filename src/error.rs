use core::fmt;

/// Error numbers reported by a JBOD device. Code 0 is "no error" and is
/// represented by `Ok(())` instead of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JbodError {
    Unmounted,
    AlreadyMounted,
    AlreadyUnmounted,
    CacheLoadFail,
    CacheWriteFail,
    BadCmd,
    BadDiskNum,
    BadBlockNum,
    BadRead,
    BadWrite,
}

impl JbodError {
    pub fn code(self) -> i32 {
        match self {
            JbodError::Unmounted => 1,
            JbodError::AlreadyMounted => 2,
            JbodError::AlreadyUnmounted => 3,
            JbodError::CacheLoadFail => 4,
            JbodError::CacheWriteFail => 5,
            JbodError::BadCmd => 6,
            JbodError::BadDiskNum => 7,
            JbodError::BadBlockNum => 8,
            JbodError::BadRead => 9,
            JbodError::BadWrite => 10,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        let err = match code {
            1 => JbodError::Unmounted,
            2 => JbodError::AlreadyMounted,
            3 => JbodError::AlreadyUnmounted,
            4 => JbodError::CacheLoadFail,
            5 => JbodError::CacheWriteFail,
            6 => JbodError::BadCmd,
            7 => JbodError::BadDiskNum,
            8 => JbodError::BadBlockNum,
            9 => JbodError::BadRead,
            10 => JbodError::BadWrite,
            _ => return None,
        };
        Some(err)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JbodError::Unmounted => "JBOD is unmounted",
            JbodError::AlreadyMounted => "JBOD is already mounted",
            JbodError::AlreadyUnmounted => "JBOD is already unmounted",
            JbodError::CacheLoadFail => "failed to load block cache",
            JbodError::CacheWriteFail => "failed to write block cache",
            JbodError::BadCmd => "invalid command",
            JbodError::BadDiskNum => "invalid disk number",
            JbodError::BadBlockNum => "invalid block number",
            JbodError::BadRead => "block read failed",
            JbodError::BadWrite => "block write failed",
        }
    }
}

impl fmt::Display for JbodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the linear address translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyMounted,
    AlreadyUnmounted,
    Unmounted,
    LengthExceeded,
    NullBuffer,
    BufferTooSmall,
    RangeInvalid,
    DeviceFault(JbodError),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyMounted => write!(f, "array is already mounted"),
            Self::AlreadyUnmounted => write!(f, "array is already unmounted"),
            Self::Unmounted => write!(f, "array is not mounted"),
            Self::LengthExceeded => {
                write!(f, "read length exceeds {} bytes", crate::MAX_READ_LEN)
            }
            Self::NullBuffer => write!(f, "no destination buffer for a non-empty read"),
            Self::BufferTooSmall => write!(f, "destination buffer shorter than read length"),
            Self::RangeInvalid => write!(f, "address range outside the array"),
            Self::DeviceFault(e) => write!(f, "device fault: {} (errno {})", e, e.code()),
        }
    }
}

impl From<JbodError> for ErrorKind {
    fn from(e: JbodError) -> Self {
        ErrorKind::DeviceFault(e)
    }
}
