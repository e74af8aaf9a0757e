//Host keyboard to machine key codes

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum System {
    Vg5000,
    Z1013,
}

/// The host keys that are not delivered as characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostKey {
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
    LeftAlt,
    RightAlt,
    LeftControl,
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MachineKey {
    /// A key of the keyboard matrix.
    Code(u8),
    /// The VG5000µ triangle key, wired to the NMI instead of the matrix.
    Triangle,
}

/// A typed character, pressed and released at once.
pub fn map_char(system: System, c: char) -> Option<u8> {
    let c = u8::try_from(u32::from(c)).ok()?;
    match system {
        //uppercase only, space comes as a key
        System::Vg5000 => (0x21..0x7f).contains(&c).then(|| c.to_ascii_uppercase()),
        //unshifted is uppercase, shifted is lowercase
        System::Z1013 => (0x20..0x7f).contains(&c).then(|| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            }
        }),
    }
}

pub fn map_key(system: System, key: HostKey) -> Option<MachineKey> {
    let code = match (system, key) {
        (System::Vg5000, HostKey::Space) => 0x20,
        (System::Vg5000, HostKey::LeftAlt) => 0x01, //Shift+Ctrl, accent
        (System::Vg5000, HostKey::Home) => 0x02, //EFFE
        (System::Vg5000, HostKey::Tab) => 0x06, //INS
        (System::Vg5000, HostKey::Escape) => 0x07,
        (System::Vg5000, HostKey::Left) => 0x08,
        (System::Vg5000, HostKey::Right) => 0x09,
        (System::Vg5000, HostKey::Down) => 0x0a,
        (System::Vg5000, HostKey::Up) => 0x0b,
        (System::Vg5000, HostKey::Backspace) => 0x0c,
        (System::Vg5000, HostKey::Enter) => 0x0d,
        (System::Vg5000, HostKey::RightAlt) => 0x0e, //Caps Lock
        (System::Vg5000, HostKey::LeftControl) => 0x0f,
        (System::Vg5000, HostKey::End) => return Some(MachineKey::Triangle),

        (System::Z1013, HostKey::Enter) => 0x0d,
        (System::Z1013, HostKey::Right) => 0x09,
        (System::Z1013, HostKey::Left) => 0x08,
        (System::Z1013, HostKey::Down) => 0x0a,
        (System::Z1013, HostKey::Up) => 0x0b,
        (System::Z1013, HostKey::Escape) => 0x03,
        _ => return None,
    };
    Some(MachineKey::Code(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vg5000_chars() {
        assert_eq!(map_char(System::Vg5000, 'a'), Some(b'A'));
        assert_eq!(map_char(System::Vg5000, 'Z'), Some(b'Z'));
        assert_eq!(map_char(System::Vg5000, '"'), Some(b'"'));
        assert_eq!(map_char(System::Vg5000, ' '), None);
        assert_eq!(map_char(System::Vg5000, '\u{7f}'), None);
        assert_eq!(map_char(System::Vg5000, 'é'), None);
    }

    #[test]
    fn z1013_chars() {
        assert_eq!(map_char(System::Z1013, 'a'), Some(b'A'));
        assert_eq!(map_char(System::Z1013, 'A'), Some(b'a'));
        assert_eq!(map_char(System::Z1013, ' '), Some(b' '));
        assert_eq!(map_char(System::Z1013, '1'), Some(b'1'));
    }

    #[test]
    fn keys() {
        assert_eq!(
            map_key(System::Vg5000, HostKey::Enter),
            Some(MachineKey::Code(0x0d))
        );
        assert_eq!(
            map_key(System::Vg5000, HostKey::Backspace),
            Some(MachineKey::Code(0x0c))
        );
        assert_eq!(
            map_key(System::Vg5000, HostKey::End),
            Some(MachineKey::Triangle)
        );
        assert_eq!(map_key(System::Vg5000, HostKey::Other), None);
        assert_eq!(
            map_key(System::Z1013, HostKey::Escape),
            Some(MachineKey::Code(0x03))
        );
        assert_eq!(map_key(System::Z1013, HostKey::Space), None);
        assert_eq!(map_key(System::Z1013, HostKey::End), None);
    }
}
