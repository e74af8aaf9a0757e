//Text typed into the machine one key at a time, as if someone were at the keyboard

use std::collections::VecDeque;

// One 60Hz frame, in microseconds
const FRAME_US: u32 = 16667;

pub struct KeyBuffer {
    keys: VecDeque<u8>,
    key_delay_us: u32,
    delay_counter_us: u32,
}

impl KeyBuffer {
    /// `key_delay_frames` is the number of 60Hz frames left between two keys, so the emulated
    /// keyboard scanner can see every press.
    pub fn new(key_delay_frames: u32) -> KeyBuffer {
        KeyBuffer {
            keys: VecDeque::new(),
            key_delay_us: key_delay_frames * FRAME_US,
            delay_counter_us: 0,
        }
    }
    pub fn put(&mut self, text: &str) {
        self.put_bytes(text.as_bytes());
    }
    /// Raw key codes, with the same line ending rules as `put`.
    pub fn put_bytes(&mut self, text: &[u8]) {
        for &c in text {
            match c {
                b'\r' => {}
                b'\n' => self.keys.push_back(0x0d),
                c => self.keys.push_back(c),
            }
        }
    }
    pub fn put_key(&mut self, key: u8) {
        self.keys.push_back(key);
    }
    /// Called once per frame, returns the key to be pressed now, if any.
    pub fn get(&mut self, frame_time_us: u32) -> Option<u8> {
        if self.keys.is_empty() {
            return None;
        }
        if self.delay_counter_us > 0 {
            self.delay_counter_us = self.delay_counter_us.saturating_sub(frame_time_us);
            return None;
        }
        self.delay_counter_us = self.key_delay_us;
        self.keys.pop_front()
    }
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
    pub fn clear(&mut self) {
        self.keys.clear();
        self.delay_counter_us = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(kb: &mut KeyBuffer, frames: usize) -> Vec<Option<u8>> {
        (0..frames).map(|_| kb.get(FRAME_US)).collect()
    }

    #[test]
    fn newline_is_return() {
        let mut kb = KeyBuffer::new(0);
        kb.put("RUN\r\n");
        assert_eq!(
            drain(&mut kb, 5),
            vec![Some(b'R'), Some(b'U'), Some(b'N'), Some(0x0d), None]
        );
        assert!(kb.is_empty());
    }

    #[test]
    fn raw_bytes_are_typed_as_is() {
        let mut kb = KeyBuffer::new(0);
        kb.put_bytes(&[0x41, 0xe9, b'\r', b'\n']);
        assert_eq!(
            drain(&mut kb, 4),
            vec![Some(0x41), Some(0xe9), Some(0x0d), None]
        );
    }

    #[test]
    fn keys_are_spaced() {
        let mut kb = KeyBuffer::new(2);
        kb.put("AB");
        assert_eq!(
            drain(&mut kb, 5),
            vec![Some(b'A'), None, None, Some(b'B'), None]
        );
    }

    #[test]
    fn longer_frames_count_more() {
        let mut kb = KeyBuffer::new(2);
        kb.put("AB");
        assert_eq!(kb.get(FRAME_US), Some(b'A'));
        assert_eq!(kb.get(3 * FRAME_US), None);
        assert_eq!(kb.get(FRAME_US), Some(b'B'));
    }

    #[test]
    fn clear() {
        let mut kb = KeyBuffer::new(5);
        kb.put("CLOAD\n");
        kb.get(FRAME_US);
        kb.clear();
        kb.put_key(b'X');
        assert_eq!(kb.get(FRAME_US), Some(b'X'));
    }
}
