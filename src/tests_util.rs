use crate::device::JbodDevice;
use crate::Mdadm;
use std::vec::Vec;

pub(crate) fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic fill data, one counter string spanning the whole range.
pub(crate) fn pattern(len: usize) -> Vec<u8> {
    let txt = rust_counter_strings::generate(len);
    let mut bytes = txt.into_bytes();
    bytes.resize(len, b'*');
    bytes
}

pub(crate) fn make_mounted<D: JbodDevice>(device: D) -> Mdadm<D> {
    let mut mdadm = Mdadm::new(device);
    mdadm.mount().unwrap();
    mdadm
}
