//! Packed 32-bit RGBA colors

/// One channel of a packed color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R,
    G,
    B,
    A,
}

impl Channel {
    /// Look up a channel by its letter (`'r'`, `'g'`, `'b'`, `'a'`, any case)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'r' => Some(Channel::R),
            'g' => Some(Channel::G),
            'b' => Some(Channel::B),
            'a' => Some(Channel::A),
            _ => None,
        }
    }

    fn shift(self) -> u32 {
        match self {
            Channel::R => 24,
            Channel::G => 16,
            Channel::B => 8,
            Channel::A => 0,
        }
    }
}

/// Color packed as `0xRRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const BLACK: Color = Color(0x0000_00FF);
    pub const TRANSPARENT: Color = Color(0);

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color((r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32)
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 0xFF)
    }

    /// Build a color from `0.0..=1.0` channel intensities
    pub fn from_floats(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color::TRANSPARENT
            .with_float(Channel::R, r)
            .with_float(Channel::G, g)
            .with_float(Channel::B, b)
            .with_float(Channel::A, a)
    }

    pub fn get(self, channel: Channel) -> u8 {
        (self.0 >> channel.shift()) as u8
    }

    pub fn get_float(self, channel: Channel) -> f32 {
        self.get(channel) as f32 / 255.0
    }

    pub fn with(self, channel: Channel, value: u8) -> Self {
        let shift = channel.shift();
        Color(self.0 & !(0xFF << shift) | (value as u32) << shift)
    }

    pub fn with_float(self, channel: Channel, value: f32) -> Self {
        self.with(channel, (value.clamp(0.0, 1.0) * 255.0) as u8)
    }

    pub fn r(self) -> u8 {
        self.get(Channel::R)
    }

    pub fn g(self) -> u8 {
        self.get(Channel::G)
    }

    pub fn b(self) -> u8 {
        self.get(Channel::B)
    }

    pub fn a(self) -> u8 {
        self.get(Channel::A)
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (self.r(), self.g(), self.b())
    }

    /// Scale the RGB channels by a light intensity, keeping alpha
    pub fn shaded(self, intensity: f32) -> Self {
        let k = intensity.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * k) as u8;
        Color::from_rgba(scale(self.r()), scale(self.g()), scale(self.b()), self.a())
    }

    /// Channel-wise product with `tint`, alpha kept from `self`
    pub fn modulate(self, tint: Color) -> Self {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
        Color::from_rgba(
            mul(self.r(), tint.r()),
            mul(self.g(), tint.g()),
            mul(self.b(), tint.b()),
            self.a(),
        )
    }
}

impl From<u32> for Color {
    fn from(rgba: u32) -> Self {
        Color(rgba)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}
