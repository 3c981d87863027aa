use log::{error, info, LevelFilter};
use mdadm::{ErrorKind, JbodSim, Mdadm, JBOD_BLOCK_SIZE, JBOD_GEOMETRY, MAX_READ_LEN};
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(about = "Read a linear address range from a simulated JBOD array")]
struct Opt {
    /// Flat disk image to load into the array. Without it every block is
    /// filled with its own disk and block number.
    #[structopt(long, parse(from_os_str))]
    image: Option<PathBuf>,

    /// First linear address to read. Accepts decimal or 0x-prefixed hex.
    #[structopt(long, parse(try_from_str = parse_addr), default_value = "0")]
    start: u32,

    /// Number of bytes to read.
    #[structopt(long, default_value = "256")]
    len: u32,

    /// Log every device command.
    #[structopt(short, long)]
    verbose: bool,
}

fn parse_addr(src: &str) -> Result<u32, std::num::ParseIntError> {
    match src.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => src.parse(),
    }
}

fn default_image() -> Vec<u8> {
    let mut image = vec![0u8; JBOD_GEOMETRY.capacity()];
    for (i, block) in image.chunks_mut(JBOD_BLOCK_SIZE).enumerate() {
        let disk = i / JBOD_GEOMETRY.blocks_per_disk;
        let id = i % JBOD_GEOMETRY.blocks_per_disk;
        block.fill(((disk << 4) as u8) ^ (id as u8));
    }
    image
}

fn hexdump(base: u32, data: &[u8]) {
    for (i, row) in data.chunks(16).enumerate() {
        let hex: Vec<String> = row.iter().map(|b| format!("{:02x}", b)).collect();
        let ascii: String = row
            .iter()
            .map(|b| if b.is_ascii_graphic() { *b as char } else { '.' })
            .collect();
        println!(
            "{:08x}  {:<47}  |{}|",
            base as usize + i * 16,
            hex.join(" "),
            ascii
        );
    }
}

/// Reject ranges that fall outside the array before anything is allocated.
fn check_range(start: u32, len: u32) -> Result<(), ErrorKind> {
    let end = start.checked_add(len).ok_or(ErrorKind::RangeInvalid)?;
    if end as usize > JBOD_GEOMETRY.capacity() {
        return Err(ErrorKind::RangeInvalid);
    }
    Ok(())
}

fn read_range(mdadm: &mut Mdadm<JbodSim>, start: u32, len: u32) -> Result<Vec<u8>, ErrorKind> {
    check_range(start, len)?;
    let mut data = vec![0u8; len as usize];
    let mut pos = 0;
    while pos < len {
        let num_bytes = std::cmp::min(MAX_READ_LEN, len - pos);
        let addr = start + pos;
        let out = &mut data[pos as usize..(pos + num_bytes) as usize];
        pos += mdadm.read(addr, num_bytes, Some(out))? as u32;
    }
    Ok(data)
}

fn main() {
    let opt = Opt::from_args();

    env_logger::builder()
        .format_timestamp_nanos()
        .filter_level(if opt.verbose {
            LevelFilter::Trace
        } else {
            LevelFilter::Warn
        })
        .init();

    let image = match &opt.image {
        Some(path) => match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("cannot read image {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => default_image(),
    };
    let sim = match JbodSim::from_image(&image) {
        Ok(sim) => sim,
        Err(e) => {
            error!("cannot load image: {}", e);
            process::exit(1);
        }
    };

    let mut mdadm = Mdadm::new(sim);
    let result = mdadm
        .mount()
        .and_then(|_| read_range(&mut mdadm, opt.start, opt.len));
    match result {
        Ok(data) => {
            info!("read {} bytes at 0x{:x}", data.len(), opt.start);
            hexdump(opt.start, &data);
        }
        Err(e) => {
            error!("read failed: {}", e);
            process::exit(1);
        }
    }
    if let Err(e) = mdadm.unmount() {
        error!("unmount failed: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_range_rejected_before_reading() {
        let mut mdadm = Mdadm::new(JbodSim::new());
        mdadm.mount().unwrap();
        mdadm.device_mut().clear_history();
        assert_eq!(
            read_range(&mut mdadm, 0, 4_000_000_000),
            Err(ErrorKind::RangeInvalid)
        );
        assert_eq!(
            read_range(&mut mdadm, u32::MAX, 2),
            Err(ErrorKind::RangeInvalid)
        );
        assert!(mdadm.device().history().is_empty());
    }

    #[test]
    fn range_longer_than_one_read() {
        let image = default_image();
        let mut mdadm = Mdadm::new(JbodSim::from_image(&image).unwrap());
        mdadm.mount().unwrap();
        let start = JBOD_GEOMETRY.capacity() as u32 - 3000;
        let data = read_range(&mut mdadm, start, 3000).unwrap();
        assert_eq!(&data[..], &image[start as usize..]);
    }

    #[test]
    fn default_image_marks_disk_and_block() {
        let image = default_image();
        assert_eq!(image.len(), JBOD_GEOMETRY.capacity());
        // Disk 1, block 2.
        let base = JBOD_GEOMETRY.disk_size + 2 * JBOD_BLOCK_SIZE;
        assert!(image[base..base + JBOD_BLOCK_SIZE]
            .iter()
            .all(|b| *b == 0x12));
        assert_eq!(image[JBOD_GEOMETRY.capacity() - 1], 0xF0 ^ 0xFF);
    }

    #[test]
    fn parses_hex_and_decimal_addresses() {
        assert_eq!(parse_addr("0x10000"), Ok(65536));
        assert_eq!(parse_addr("65535"), Ok(65535));
        assert!(parse_addr("0xZZ").is_err());
    }
}
