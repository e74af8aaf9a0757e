/*
 * Elementary impulses of the VG5000µ cassette signal.
 *
 * An impulse is a pair of half-periods of the same length: a short one is a "1" (half of it,
 * actually, a bit 1 is two short impulses), a long one is a "0". Bytes go out LSB first and
 * each one is closed by the end-of-byte marker: 4 short impulses and a long one.
 */

use crate::error::{Result, TapeError};

// Half-period lengths, in ticks
pub const SHORT_PULSE: u16 = 833;
pub const LONG_PULSE: u16 = 1666;

pub const VALUES_PER_IMPULSE: usize = 2;
pub const END_OF_BYTE_VALUES: usize = 5 * VALUES_PER_IMPULSE;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Impulse {
    Short,
    Long,
}

impl Impulse {
    fn half_period(self) -> u16 {
        match self {
            Impulse::Short => SHORT_PULSE,
            Impulse::Long => LONG_PULSE,
        }
    }
}

/// Appends impulses to a pulse train that may never grow past `limit` values.
pub struct PulseWriter {
    pulses: Vec<u16>,
    limit: usize,
}

impl PulseWriter {
    pub fn with_limit(limit: usize) -> PulseWriter {
        PulseWriter {
            pulses: Vec::with_capacity(limit),
            limit,
        }
    }
    fn push(&mut self, values: &[u16]) -> Result<usize> {
        if self.pulses.len() + values.len() > self.limit {
            return Err(TapeError::CapacityExceeded { capacity: self.limit });
        }
        self.pulses.extend_from_slice(values);
        Ok(values.len())
    }
    /// A single half-period, used to leave the line in a known state.
    pub fn silence(&mut self, len: u16) -> Result<usize> {
        self.push(&[len])
    }
    pub fn impulse(&mut self, impulse: Impulse) -> Result<usize> {
        let t = impulse.half_period();
        self.push(&[t, t])
    }
    pub fn short_impulse(&mut self) -> Result<usize> {
        self.impulse(Impulse::Short)
    }
    pub fn long_impulse(&mut self) -> Result<usize> {
        self.impulse(Impulse::Long)
    }
    /// A synchronization run of `count` short impulses.
    pub fn sync(&mut self, count: u32) -> Result<usize> {
        let mut n = 0;
        for _ in 0..count {
            n += self.short_impulse()?;
        }
        Ok(n)
    }
    pub fn end_of_byte(&mut self) -> Result<usize> {
        let mut n = 0;
        for _ in 0..4 {
            n += self.short_impulse()?;
        }
        n += self.long_impulse()?;
        Ok(n)
    }
    /// Writes the bits of `byte`, LSB first. Does not write the end-of-byte marker.
    pub fn byte(&mut self, mut byte: u8) -> Result<usize> {
        let mut n = 0;
        for _ in 0..8 {
            if byte & 1 != 0 {
                n += self.short_impulse()?;
                n += self.short_impulse()?;
            } else {
                n += self.long_impulse()?;
            }
            byte >>= 1;
        }
        Ok(n)
    }
    /// A byte followed by its end-of-byte marker.
    pub fn framed_byte(&mut self, byte: u8) -> Result<usize> {
        let n = self.byte(byte)?;
        Ok(n + self.end_of_byte()?)
    }
    pub fn len(&self) -> usize {
        self.pulses.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }
    pub fn limit(&self) -> usize {
        self.limit
    }
    pub fn into_inner(self) -> Vec<u16> {
        self.pulses
    }
}

/// Walks a pulse train impulse by impulse, the reverse of `PulseWriter`.
pub struct PulseReader<'a> {
    pulses: &'a [u16],
    pos: usize,
}

impl<'a> PulseReader<'a> {
    pub fn new(pulses: &'a [u16]) -> PulseReader<'a> {
        PulseReader { pulses, pos: 0 }
    }
    pub fn position(&self) -> usize {
        self.pos
    }
    pub fn at_end(&self) -> bool {
        self.pos >= self.pulses.len()
    }
    fn malformed<T>(&self, reason: &'static str) -> Result<T> {
        Err(TapeError::Malformed { position: self.pos, reason })
    }
    pub fn silence(&mut self) -> Result<u16> {
        match self.pulses.get(self.pos) {
            Some(&t) => {
                self.pos += 1;
                Ok(t)
            }
            None => self.malformed("missing leading silence"),
        }
    }
    pub fn peek_impulse(&self) -> Result<Impulse> {
        let pair = match self.pulses.get(self.pos..self.pos + VALUES_PER_IMPULSE) {
            Some(p) => p,
            None => return self.malformed("truncated impulse"),
        };
        match (pair[0], pair[1]) {
            (SHORT_PULSE, SHORT_PULSE) => Ok(Impulse::Short),
            (LONG_PULSE, LONG_PULSE) => Ok(Impulse::Long),
            _ => self.malformed("unknown impulse"),
        }
    }
    pub fn impulse(&mut self) -> Result<Impulse> {
        let imp = self.peek_impulse()?;
        self.pos += VALUES_PER_IMPULSE;
        Ok(imp)
    }
    /// Consumes a synchronization run and the end-of-byte marker closing it.
    /// Returns the number of short impulses in the run proper.
    pub fn sync(&mut self) -> Result<usize> {
        let mut shorts: usize = 0;
        while self.impulse()? == Impulse::Short {
            shorts += 1;
        }
        //the last 4 shorts belong to the end-of-byte marker
        match shorts.checked_sub(4) {
            Some(n) => Ok(n),
            None => self.malformed("synchronization too short"),
        }
    }
    pub fn byte(&mut self) -> Result<u8> {
        let mut byte = 0;
        for bit in 0..8 {
            match self.impulse()? {
                Impulse::Short => {
                    if self.impulse()? != Impulse::Short {
                        return self.malformed("half a bit 1");
                    }
                    byte |= 1 << bit;
                }
                Impulse::Long => {}
            }
        }
        Ok(byte)
    }
    pub fn end_of_byte(&mut self) -> Result<()> {
        for _ in 0..4 {
            if self.impulse()? != Impulse::Short {
                return self.malformed("bad end-of-byte marker");
            }
        }
        if self.impulse()? != Impulse::Long {
            return self.malformed("bad end-of-byte marker");
        }
        Ok(())
    }
    pub fn framed_byte(&mut self) -> Result<u8> {
        let b = self.byte()?;
        self.end_of_byte()?;
        Ok(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulses_are_pairs() {
        let mut w = PulseWriter::with_limit(16);
        assert_eq!(w.short_impulse(), Ok(2));
        assert_eq!(w.long_impulse(), Ok(2));
        assert_eq!(w.into_inner(), vec![833, 833, 1666, 1666]);
    }

    #[test]
    fn end_of_byte_shape() {
        let mut w = PulseWriter::with_limit(16);
        assert_eq!(w.end_of_byte(), Ok(END_OF_BYTE_VALUES));
        assert_eq!(
            w.into_inner(),
            vec![833, 833, 833, 833, 833, 833, 833, 833, 1666, 1666]
        );
    }

    #[test]
    fn bit_costs_are_asymmetric() {
        let mut w = PulseWriter::with_limit(64);
        assert_eq!(w.byte(0x00), Ok(16));
        assert_eq!(w.byte(0xff), Ok(32));
        let pulses = w.into_inner();
        assert!(pulses[..16].iter().all(|&t| t == LONG_PULSE));
        assert!(pulses[16..].iter().all(|&t| t == SHORT_PULSE));
    }

    #[test]
    fn byte_is_lsb_first() {
        let mut w = PulseWriter::with_limit(64);
        w.byte(0x01).unwrap();
        let pulses = w.into_inner();
        //bit 0 set: two short impulses, then 7 long ones
        assert_eq!(&pulses[..4], &[833; 4]);
        assert_eq!(&pulses[4..], &[1666; 14]);
    }

    #[test]
    fn writer_stops_at_limit() {
        let mut w = PulseWriter::with_limit(9);
        assert_eq!(
            w.end_of_byte(),
            Err(TapeError::CapacityExceeded { capacity: 9 })
        );
        //the pulses before the failing one are kept, nothing past the limit
        assert_eq!(w.len(), 8);
        assert!(w.silence(1).is_ok());
        assert!(w.silence(1).is_err());
    }

    #[test]
    fn reader_reverses_writer() {
        let mut w = PulseWriter::with_limit(1024);
        w.silence(17400).unwrap();
        w.sync(10).unwrap();
        w.end_of_byte().unwrap();
        for b in [0x00, 0x5a, 0xff, 0x80] {
            w.framed_byte(b).unwrap();
        }
        let pulses = w.into_inner();
        let mut r = PulseReader::new(&pulses);
        assert_eq!(r.silence(), Ok(17400));
        assert_eq!(r.sync(), Ok(10));
        for b in [0x00, 0x5a, 0xff, 0x80] {
            assert_eq!(r.framed_byte(), Ok(b));
        }
        assert!(r.at_end());
    }

    #[test]
    fn sync_counts_run_without_marker() {
        let mut w = PulseWriter::with_limit(64);
        w.sync(3).unwrap();
        w.end_of_byte().unwrap();
        let pulses = w.into_inner();
        assert_eq!(PulseReader::new(&pulses).sync(), Ok(3));

        //only 3 shorts before the long impulse: not even the marker is there
        let mut w = PulseWriter::with_limit(64);
        w.sync(3).unwrap();
        w.long_impulse().unwrap();
        let pulses = w.into_inner();
        assert!(matches!(
            PulseReader::new(&pulses).sync(),
            Err(TapeError::Malformed { position: 8, .. })
        ));
    }

    #[test]
    fn reader_rejects_garbage() {
        let pulses = [833, 1666];
        let mut r = PulseReader::new(&pulses);
        assert!(matches!(
            r.impulse(),
            Err(TapeError::Malformed { position: 0, .. })
        ));
        let pulses = [833];
        let mut r = PulseReader::new(&pulses);
        assert!(r.impulse().is_err());
    }
}
