/*
 * VG5000µ cassette images (.k7) and the tape signal they turn into.
 *
 * A .k7 file is the raw byte stream of the tape: a 32 byte header block and then the data
 * block. The signal is a leading silence, a long synchronization, the framed header, a second,
 * shorter synchronization and the framed data.
 */

use crate::error::{Result, TapeError};
use crate::pulse::{PulseReader, PulseWriter};

pub const HEADER_LEN: usize = 32;

// In ticks, it also leaves the line high at the end
const LEADING_SILENCE: u16 = 17400;
const HEADER_SYNC: u32 = 30000;
const DATA_SYNC: u32 = 7200;

//Empirical. The worst case (all bits set) is 42 values per byte plus about 75000 for the
//synchronization runs, so images of all-set bytes past ~560KB do not fit.
const CAPACITY_MARGIN: usize = 30000;
const CAPACITY_RATIO: usize = 40;

/// Number of `u16` values allocated for the signal of an image of `k7_len` bytes.
pub fn buffer_capacity(k7_len: usize) -> usize {
    (k7_len + CAPACITY_MARGIN) * CAPACITY_RATIO
}

/// The encoded tape signal, a list of half-period lengths.
///
/// The buffer keeps its original allocation, only the written part is visible.
#[derive(Debug)]
pub struct TapeBuffer {
    pulses: Vec<u16>,
    capacity: usize,
}

impl TapeBuffer {
    pub fn pulses(&self) -> &[u16] {
        &self.pulses
    }
    pub fn len(&self) -> usize {
        self.pulses.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }
    /// Size of the signal in bytes, 2 per value.
    pub fn byte_len(&self) -> usize {
        self.pulses.len() * 2
    }
    /// Allocated capacity in values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn capacity_bytes(&self) -> usize {
        self.capacity * 2
    }
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.pulses.iter().flat_map(|t| t.to_le_bytes()).collect()
    }
    /// Gives the buffer back. Consuming `self` makes a second release impossible.
    pub fn release(self) {
        log::debug!("releasing tape buffer of {} bytes", self.capacity_bytes());
    }
}

// In u64, on wasm32 `used * 100` overflows for images of a couple of MB
fn usage_percent(used: usize, capacity: usize) -> u64 {
    used as u64 * 100 / capacity as u64
}

pub fn encode(k7: &[u8]) -> Result<TapeBuffer> {
    if k7.len() < HEADER_LEN {
        return Err(TapeError::InputTooShort {
            len: k7.len(),
            min: HEADER_LEN,
        });
    }
    let capacity = buffer_capacity(k7.len());
    let mut w = PulseWriter::with_limit(capacity);

    w.silence(LEADING_SILENCE)?;

    w.sync(HEADER_SYNC)?;
    w.end_of_byte()?;
    let (header, data) = k7.split_at(HEADER_LEN);
    for &b in header {
        w.framed_byte(b)?;
    }

    w.sync(DATA_SYNC)?;
    w.end_of_byte()?;
    //TODO: the data length could be taken from the header instead of the file size
    for &b in data {
        w.framed_byte(b)?;
    }

    log::debug!(
        "k7: {} bytes in, {} values allocated, {} used ({}%)",
        k7.len(),
        capacity,
        w.len(),
        usage_percent(w.len(), capacity)
    );
    Ok(TapeBuffer {
        pulses: w.into_inner(),
        capacity,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTape {
    pub header: Vec<u8>,
    pub data: Vec<u8>,
    pub header_sync: usize,
    pub data_sync: usize,
}

impl DecodedTape {
    /// The original .k7 image.
    pub fn image(&self) -> Vec<u8> {
        let mut res = self.header.clone();
        res.extend_from_slice(&self.data);
        res
    }
}

pub fn decode(pulses: &[u16]) -> Result<DecodedTape> {
    let mut r = PulseReader::new(pulses);
    r.silence()?;
    let header_sync = r.sync()?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    for _ in 0..HEADER_LEN {
        header.push(r.framed_byte()?);
    }
    let data_sync = r.sync()?;
    let mut data = Vec::new();
    while !r.at_end() {
        data.push(r.framed_byte()?);
    }
    Ok(DecodedTape {
        header,
        data,
        header_sync,
        data_sync,
    })
}

#[cfg(feature = "zip")]
pub fn image_from_zip(data: &[u8]) -> anyhow::Result<Vec<u8>> {
    use anyhow::anyhow;
    use std::io::{Cursor, Read};

    let mut zip = zip::ZipArchive::new(Cursor::new(data))?;
    for i in 0..zip.len() {
        let mut ze = zip.by_index(i)?;
        if ze.name().to_ascii_lowercase().ends_with(".k7") {
            log::info!("unzipping K7 {}", ze.name());
            let mut res = Vec::new();
            ze.read_to_end(&mut res)?;
            return Ok(res);
        }
    }
    Err(anyhow!("no .k7 file in the archive"))
}

#[cfg(not(feature = "zip"))]
pub fn image_from_zip(_data: &[u8]) -> anyhow::Result<Vec<u8>> {
    Err(anyhow::anyhow!("compressed tapes are not supported"))
}
