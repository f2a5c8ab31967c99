//! Trail canvas and the game-space to pixel mapping
//!
//! Tiles are painted into a persistent pixel buffer that is never cleared,
//! so the picture is the accumulated trail of every cell each player has
//! occupied. The window frontend uploads the buffer as a texture.

use log::debug;
use macroquad::color::Color;
use macroquad::texture::Image;
use shared::Position;

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];
const UNKNOWN_COLOR: [u8; 4] = [136, 136, 136, 255];

/// Fixed-size RGBA pixel buffer.
pub struct TrailCanvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl TrailCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fills a `w × h` rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, rgba: [u8; 4]) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);

        for py in y..y_end {
            let row = (py as usize) * (self.width as usize);
            for px in x..x_end {
                self.pixels[row + px as usize] = rgba;
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y as usize) * (self.width as usize) + x as usize)
            .copied()
    }

    /// Snapshot of the buffer as a macroquad image.
    pub fn to_image(&self) -> Image {
        Image {
            bytes: self.pixels.iter().flatten().copied().collect(),
            width: self.width as u16,
            height: self.height as u16,
        }
    }
}

pub struct Renderer {
    tile_size: u32,
    canvas: TrailCanvas,
    fills: u64,
}

impl Renderer {
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        Renderer {
            tile_size,
            canvas: TrailCanvas::new(width, height),
            fills: 0,
        }
    }

    /// Maps a game-space position onto the canvas, wrapping on both axes.
    pub fn to_pixel(&self, position: Position) -> (u32, u32) {
        (
            wrap(position.x, self.tile_size, self.canvas.width()),
            wrap(position.y, self.tile_size, self.canvas.height()),
        )
    }

    /// Paints one tile for `name` at `position`. Nothing is erased first.
    pub fn draw(&mut self, name: &str, color: &str, position: Position) {
        let (x, y) = self.to_pixel(position);
        let rgba = match parse_color(color) {
            Some(color) => rgba_bytes(color),
            None => {
                debug!("Unrecognised color {:?} for {}", color, name);
                UNKNOWN_COLOR
            }
        };

        self.canvas
            .fill_rect(x, y, self.tile_size, self.tile_size, rgba);
        self.fills += 1;
    }

    pub fn canvas(&self) -> &TrailCanvas {
        &self.canvas
    }

    /// Number of tiles painted since creation.
    pub fn fills(&self) -> u64 {
        self.fills
    }
}

fn wrap(coord: i32, tile_size: u32, extent: u32) -> u32 {
    if extent == 0 {
        return 0;
    }
    (coord as i64 * tile_size as i64).rem_euclid(extent as i64) as u32
}

pub fn rgba_bytes(color: Color) -> [u8; 4] {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        channel(color.r),
        channel(color.g),
        channel(color.b),
        channel(color.a),
    ]
}

/// Parses the server's display colors: `#rgb`, `#rrggbb` or a CSS name.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let (r, g, b) = match value.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "pink" => (255, 192, 203),
        "brown" => (165, 42, 42),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };

    Some(Color::from_rgba(r, g, b, 255))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    match hex.len() {
        3 => {
            let (r, g, b) = (digit(0)?, digit(1)?, digit(2)?);
            Some(Color::from_rgba(r * 17, g * 17, b * 17, 255))
        }
        6 => Some(Color::from_rgba(pair(0)?, pair(2)?, pair(4)?, 255)),
        _ => None,
    }
}
