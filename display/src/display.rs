use anyhow::{Context, Result};
use sdl2::pixels::PixelFormatEnum;

use emu8::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, PIXEL_ON};
use emu8::FrameBuffer;

/// The RGB colors lit and unlit pixels are rendered in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub on: [u8; 3],
    pub off: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            on: [0x84, 0xB8, 0x89],
            off: [0x1D, 0x44, 0x21],
        }
    }
}

/// # Display
/// The Chip-8 display is composed of 64x32 pixels black/white pixels.
/// The on/off state of these pixels is encoded as whole words in a 2d array.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    palette: Palette,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    /// * `palette` the colors to draw lit and unlit pixels with
    pub fn new(sdl: &sdl2::Sdl, scale: u32, palette: Palette) -> Result<Self> {
        let video_subsystem = sdl.video().map_err(anyhow::Error::msg)?;
        let window = video_subsystem
            .window(
                "Emu-8",
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .opengl()
            .build()
            .context("unable to open a window")?;
        let canvas = window
            .into_canvas()
            .build()
            .context("unable to create a canvas")?;

        Ok(Display { canvas, palette })
    }

    /// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 texture is a 1D array of bytes that represent concatenated rows of RGB pixels.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    /// * `palette` the colors of lit and unlit pixels
    fn frame_to_sdl_texture(frame: &FrameBuffer, palette: &Palette) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .flat_map(|&pixel| {
                if pixel == PIXEL_ON {
                    palette.on
                } else {
                    palette.off
                }
            })
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<()> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
        )?;

        let pixels = Display::frame_to_sdl_texture(frame, &self.palette);
        texture
            .with_lock(None, |buffer: &mut [u8], _pitch: usize| {
                buffer.copy_from_slice(&pixels);
            })
            .map_err(anyhow::Error::msg)?;

        self.canvas
            .copy(&texture, None, None)
            .map_err(anyhow::Error::msg)?;
        self.canvas.present();
        Ok(())
    }
}
