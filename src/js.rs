use crate::k7::{self, TapeBuffer};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    let _ = console_log::init_with_level(log::Level::Info);
}

/// A tape signal owned by JS. It must be given back with `release()` (or `free()`) once
/// the emulator has its copy.
#[wasm_bindgen]
pub struct TapeSignal(TapeBuffer);

#[wasm_bindgen]
impl TapeSignal {
    pub fn ptr(&self) -> *const u16 {
        self.0.pulses().as_ptr()
    }
    #[wasm_bindgen(js_name = byteLen)]
    pub fn byte_len(&self) -> usize {
        self.0.byte_len()
    }
    #[wasm_bindgen(js_name = capacityBytes)]
    pub fn capacity_bytes(&self) -> usize {
        self.0.capacity_bytes()
    }
    pub fn release(self) {
        self.0.release();
    }
}

#[wasm_bindgen(js_name = encodeK7)]
pub fn encode_k7(data: &[u8]) -> Result<TapeSignal, JsError> {
    let tape = k7::encode(data)?;
    Ok(TapeSignal(tape))
}

#[wasm_bindgen(js_name = encodeZippedK7)]
pub fn encode_zipped_k7(data: &[u8]) -> Result<TapeSignal, JsError> {
    let image = k7::image_from_zip(data).map_err(|e| JsError::new(&e.to_string()))?;
    encode_k7(&image)
}
