use std::fmt;

/// A JPEG marker: `0xFF` followed by a non-zero, non-`0xFF` code byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker(pub u16);

impl Marker {
    /// Temporary private use, standalone
    pub const TEM: Marker = Marker(0xFF01);

    /// Start Of Frame (baseline DCT)
    pub const SOF0: Marker = Marker(0xFFC0);

    /// Start Of Frame (progressive DCT)
    pub const SOF2: Marker = Marker(0xFFC2);

    /// Define Huffman Table(s)
    pub const DHT: Marker = Marker(0xFFC4);

    /// Restart markers carry no length field
    pub const RST0: Marker = Marker(0xFFD0);
    pub const RST7: Marker = Marker(0xFFD7);

    /// Start Of Image
    pub const SOI: Marker = Marker(0xFFD8);

    /// End Of Image
    pub const EOI: Marker = Marker(0xFFD9);

    /// Start Of Scan, entropy-coded data follows
    pub const SOS: Marker = Marker(0xFFDA);

    /// Define Quantization Table(s)
    pub const DQT: Marker = Marker(0xFFDB);

    /// Define Restart Interval
    pub const DRI: Marker = Marker(0xFFDD);

    /// JFIF
    pub const APP0: Marker = Marker(0xFFE0);

    /// EXIF, also used by XMP
    pub const APP1: Marker = Marker(0xFFE1);

    /// ICC profile
    pub const APP2: Marker = Marker(0xFFE2);

    /// Photoshop IRB / IPTC
    pub const APP13: Marker = Marker(0xFFED);

    /// Adobe
    pub const APP14: Marker = Marker(0xFFEE);

    pub const APP15: Marker = Marker(0xFFEF);

    /// Comment
    pub const COM: Marker = Marker(0xFFFE);

    /// Build from the code byte following `0xFF`.
    #[inline]
    pub const fn from_code(code: u8) -> Self {
        Marker(0xFF00 | code as u16)
    }

    #[inline]
    pub const fn code(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub const fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Markers that are not followed by a length field.
    pub const fn is_standalone(self) -> bool {
        matches!(self.0, 0xFF01 | 0xFFD0..=0xFFD9)
    }

    /// Markers after which only raw image data follows.
    pub const fn ends_header(self) -> bool {
        self.0 == Self::SOS.0 || self.0 == Self::EOI.0
    }

    pub const fn is_app(self) -> bool {
        self.0 >= Self::APP0.0 && self.0 <= Self::APP15.0
    }

    /// Short mnemonic such as `APP1` or `SOF0`.
    pub fn name(self) -> String {
        let code = self.code();
        match code {
            0x01 => "TEM".to_string(),
            0xC4 => "DHT".to_string(),
            0xC8 => "JPG".to_string(),
            0xCC => "DAC".to_string(),
            0xC0..=0xCF => format!("SOF{}", code - 0xC0),
            0xD0..=0xD7 => format!("RST{}", code - 0xD0),
            0xD8 => "SOI".to_string(),
            0xD9 => "EOI".to_string(),
            0xDA => "SOS".to_string(),
            0xDB => "DQT".to_string(),
            0xDC => "DNL".to_string(),
            0xDD => "DRI".to_string(),
            0xE0..=0xEF => format!("APP{}", code - 0xE0),
            0xFE => "COM".to_string(),
            _ => format!("0x{:04X}", self.0),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.name(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Marker::APP1.name(), "APP1");
        assert_eq!(Marker::SOF2.name(), "SOF2");
        assert_eq!(Marker::from_code(0xD3).name(), "RST3");
        assert_eq!(Marker::DHT.name(), "DHT");
        assert_eq!(Marker::from_code(0xF0).name(), "0xFFF0");
        assert_eq!(Marker::APP1.to_string(), "APP1 (0xFFE1)");
    }

    #[test]
    fn test_classification() {
        assert!(Marker::RST0.is_standalone());
        assert!(Marker::RST7.is_standalone());
        assert!(Marker::TEM.is_standalone());
        assert!(!Marker::APP1.is_standalone());
        assert!(!Marker::SOS.is_standalone());
        assert!(Marker::SOS.ends_header());
        assert!(Marker::EOI.ends_header());
        assert!(Marker::APP13.is_app());
        assert!(!Marker::COM.is_app());
    }

    #[test]
    fn test_bytes() {
        assert_eq!(Marker::SOI.to_bytes(), [0xFF, 0xD8]);
        assert_eq!(Marker::from_code(0xE1), Marker::APP1);
        assert_eq!(Marker::APP1.code(), 0xE1);
    }
}
