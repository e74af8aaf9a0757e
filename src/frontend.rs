use crate::k7::{self, TapeBuffer};
use crate::keybuf::KeyBuffer;
use crate::keymap::{self, HostKey, MachineKey, System};
use anyhow::anyhow;
use std::path::Path;

// One 60Hz frame, in microseconds
const FRAME_US: u64 = 16667;
// Frames after the load delay before a success is worth a flash
const FLASH_GRACE_FRAMES: u64 = 10;

/// The emulated computer, as seen by the front-end.
pub trait Machine {
    /// Called once, before any other call.
    fn boot(&mut self, model: Model);
    fn key_down(&mut self, key: u8);
    fn key_up(&mut self, key: u8);
    fn triangle_key_pressed(&mut self) {}
    /// Takes a copy of the signal: the front-end releases the buffer right after this call.
    fn insert_tape(&mut self, tape: &TapeBuffer) -> bool;
    fn quickload(&mut self, data: &[u8]) -> bool;
}

pub trait Gui {
    fn flash_success(&mut self);
    fn flash_error(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Model {
    Vg5000V10,
    Vg5000V11,
    Z1013V01,
    Z1013V16,
    Z1013V64,
}

impl Model {
    pub fn system(self) -> System {
        match self {
            Model::Vg5000V10 | Model::Vg5000V11 => System::Vg5000,
            Model::Z1013V01 | Model::Z1013V16 | Model::Z1013V64 => System::Z1013,
        }
    }
    /// Parses the name given on the command line, as in `type=z1013_16`.
    pub fn from_name(name: &str) -> Option<Model> {
        let model = match name {
            "vg5000_10" => Model::Vg5000V10,
            "vg5000_11" => Model::Vg5000V11,
            "z1013_01" => Model::Z1013V01,
            "z1013_16" => Model::Z1013V16,
            "z1013_64" => Model::Z1013V64,
            _ => return None,
        };
        Some(model)
    }
}

pub struct FrontendConfig {
    pub model: Model,
    /// 60Hz frames to wait before loading a file, so the ROM can boot.
    pub load_delay_frames: u32,
    pub key_delay_frames: u32,
    /// Typed once the file is loaded, or right away if there is no file.
    pub input: Option<String>,
}

impl FrontendConfig {
    pub fn vg5000() -> FrontendConfig {
        FrontendConfig {
            model: Model::Vg5000V11,
            load_delay_frames: 120,
            key_delay_frames: 5,
            input: None,
        }
    }
    pub fn z1013() -> FrontendConfig {
        FrontendConfig {
            model: Model::Z1013V64,
            load_delay_frames: 20,
            key_delay_frames: 6,
            input: None,
        }
    }
    pub fn system(&self) -> System {
        self.model.system()
    }
}

pub struct PendingFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl PendingFile {
    fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

pub struct Frontend<M, G> {
    config: FrontendConfig,
    machine: M,
    gui: G,
    keybuf: KeyBuffer,
    file: Option<PendingFile>,
    elapsed_us: u64,
}

impl<M: Machine, G: Gui> Frontend<M, G> {
    pub fn new(config: FrontendConfig, mut machine: M, gui: G, file: Option<PendingFile>) -> Frontend<M, G> {
        machine.boot(config.model);
        let mut keybuf = KeyBuffer::new(config.key_delay_frames);
        if file.is_none() {
            if let Some(input) = &config.input {
                keybuf.put(input);
            }
        }
        Frontend {
            config,
            machine,
            gui,
            keybuf,
            file,
            elapsed_us: 0,
        }
    }
    pub fn machine(&self) -> &M {
        &self.machine
    }
    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }
    pub fn gui(&self) -> &G {
        &self.gui
    }
    /// Frames elapsed since start, counted at 60Hz whatever the real frame rate.
    pub fn frame_count_60hz(&self) -> u64 {
        self.elapsed_us / FRAME_US
    }
    /// Queues a file, it is loaded by a later `frame()`.
    pub fn drop_file(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.file = Some(PendingFile { name: name.into(), data });
    }
    pub fn frame(&mut self, frame_time_us: u32) {
        self.elapsed_us += u64::from(frame_time_us);
        self.handle_file_loading();
        self.send_keybuf_input(frame_time_us);
    }
    pub fn char_input(&mut self, c: char) {
        if let Some(key) = keymap::map_char(self.config.system(), c) {
            self.machine.key_down(key);
            self.machine.key_up(key);
        }
    }
    pub fn key_down(&mut self, key: HostKey) {
        match keymap::map_key(self.config.system(), key) {
            Some(MachineKey::Code(k)) => self.machine.key_down(k),
            Some(MachineKey::Triangle) => self.machine.triangle_key_pressed(),
            None => {}
        }
    }
    pub fn key_up(&mut self, key: HostKey) {
        //the triangle key has no release
        if let Some(MachineKey::Code(k)) = keymap::map_key(self.config.system(), key) {
            self.machine.key_up(k);
        }
    }

    fn handle_file_loading(&mut self) {
        let load_delay = u64::from(self.config.load_delay_frames);
        if self.frame_count_60hz() <= load_delay {
            return;
        }
        let Some(file) = self.file.take() else {
            return;
        };
        match self.load(&file) {
            Ok(()) => {
                if self.frame_count_60hz() > load_delay + FLASH_GRACE_FRAMES {
                    self.gui.flash_success();
                }
                if let Some(input) = &self.config.input {
                    self.keybuf.put(input);
                }
            }
            Err(e) => {
                log::warn!("loading {}: {}", file.name, e);
                self.gui.flash_error();
            }
        }
    }

    fn load(&mut self, file: &PendingFile) -> anyhow::Result<()> {
        let ext = file.extension();
        match (self.config.system(), ext.as_str()) {
            (System::Vg5000, "k7") => self.insert_k7(&file.data),
            (System::Vg5000, "zip") => {
                let k7 = k7::image_from_zip(&file.data)?;
                self.insert_k7(&k7)
            }
            (System::Z1013, "txt" | "bas") => {
                //typed up to the first NUL, like a C string
                let len = file.data.iter().position(|&b| b == 0).unwrap_or(file.data.len());
                self.keybuf.put_bytes(&file.data[..len]);
                Ok(())
            }
            _ => {
                if self.machine.quickload(&file.data) {
                    Ok(())
                } else {
                    Err(anyhow!("quickload failed"))
                }
            }
        }
    }

    fn insert_k7(&mut self, k7: &[u8]) -> anyhow::Result<()> {
        let inserted = match k7::encode(k7) {
            Ok(tape) => {
                let ok = self.machine.insert_tape(&tape);
                tape.release();
                ok
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        };
        log::info!("Inserting tape: {}", if inserted { "success" } else { "failure" });
        if !inserted {
            return Err(anyhow!("tape not inserted"));
        }
        self.keybuf.put("CLOAD\n");
        Ok(())
    }

    fn send_keybuf_input(&mut self, frame_time_us: u32) {
        if let Some(key) = self.keybuf.get(frame_time_us) {
            self.machine.key_down(key);
            self.machine.key_up(key);
        }
    }
}
