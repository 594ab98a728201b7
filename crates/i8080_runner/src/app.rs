use std::time::{Duration, Instant};

use i8080::io::InputState;
use i8080::trace::LogTracer;
use i8080::{InvadersMachine, SCREEN_HEIGHT, SCREEN_WIDTH};
use i8080_common::app::App;
use i8080_common::color::Color;
use i8080_common::key::Key;

use crate::options::DEFAULT_SCALE;

/// Rows (counted from the bottom of the rotated screen) tinted by the
/// cabinet's colour overlay.
const RED_BAND: std::ops::Range<usize> = 201..220;
const GREEN_BAND_END: usize = 80;

/// Frontend-facing wrapper that turns key events into port-1 input bits
/// and video RAM into RGB24 frames.
pub struct InvadersApp {
    pub machine: InvadersMachine,
    inputs: InputState,
    paused: bool,
    should_exit: bool,
    scale: u32,
    trace: bool,
    fps: Option<FpsCounter>,
}

impl InvadersApp {
    pub fn new(machine: InvadersMachine) -> Self {
        Self {
            machine,
            inputs: InputState::empty(),
            paused: false,
            should_exit: false,
            scale: DEFAULT_SCALE,
            trace: false,
            fps: None,
        }
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_fps(mut self, show_fps: bool) -> Self {
        self.fps = show_fps.then(FpsCounter::new);
        self
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Run one frame of the machine with the current button state.
    pub fn run_frame(&mut self) -> i8080::Result<u32> {
        self.machine.set_inputs(self.inputs);
        let cycles = if self.trace {
            self.machine.step_frame_traced(&mut LogTracer)?
        } else {
            self.machine.step_frame()?
        };
        if let Some(fps) = &mut self.fps {
            fps.tick();
        }
        Ok(cycles)
    }
}

impl App for InvadersApp {
    fn init(&mut self) {
        log::info!("Space Invaders init");
    }

    fn update(&mut self, screen_state: &mut [u8]) {
        if !self.paused {
            if let Err(err) = self.run_frame() {
                log::error!("emulation stopped: {err}");
                self.should_exit = true;
            }
        }
        render_video(self.machine.video_ram(), screen_state);
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        match key {
            Key::P if is_down => {
                self.paused = !self.paused;
                log::info!("{}", if self.paused { "paused" } else { "resumed" });
            }
            Key::Escape if is_down => self.should_exit = true,
            _ => {
                if let Some(bit) = input_for_key(key) {
                    self.inputs.set(bit, is_down);
                }
            }
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        log::info!("Space Invaders exit after {} frames", self.machine.frames());
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        self.scale
    }

    fn title(&self) -> String {
        "i8080 Space Invaders".to_string()
    }
}

/// Port-1 bit driven by `key`, if any.
pub fn input_for_key(key: Key) -> Option<InputState> {
    match key {
        Key::C => Some(InputState::CREDIT),
        Key::Num1 => Some(InputState::P1_START),
        Key::Num2 => Some(InputState::P2_START),
        Key::A | Key::Left => Some(InputState::P1_LEFT),
        Key::D | Key::Right => Some(InputState::P1_RIGHT),
        Key::S | Key::Space => Some(InputState::P1_SHOOT),
        _ => None,
    }
}

/// Expand the rotated 1bpp frame buffer into an upright RGB24 image.
///
/// Each byte holds 8 vertical pixels, least significant bit lowest; there
/// are 224 columns of 32 bytes each.
pub fn render_video(vram: &[u8], screen_state: &mut [u8]) {
    let width = SCREEN_WIDTH;
    let height = SCREEN_HEIGHT;
    debug_assert_eq!(vram.len(), width * height / 8);
    debug_assert_eq!(screen_state.len(), width * height * 3);

    let mut bytes = vram.iter();
    for x in 0..width {
        for row in (0..height).step_by(8) {
            let mut byte = bytes.next().copied().unwrap_or(0);
            for bit in 0..8 {
                let pixel_on = byte & 1 != 0;
                byte >>= 1;

                let y = height - (row + bit) - 1;
                let color = if !pixel_on {
                    Color::BLACK
                } else if RED_BAND.contains(&row) {
                    Color::RED
                } else if row < GREEN_BAND_END {
                    Color::GREEN
                } else {
                    Color::WHITE
                };
                color.write_rgb24(screen_state, (y * width + x) * 3);
            }
        }
    }
}

/// Logs the frame rate once a second.
struct FpsCounter {
    since: Instant,
    frames: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            since: Instant::now(),
            frames: 0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed >= Duration::from_secs(1) {
            log::info!("{:.1} fps", f64::from(self.frames) / elapsed.as_secs_f64());
            self.frames = 0;
            self.since = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Vec<u8> {
        vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3]
    }

    fn pixel(screen: &[u8], x: usize, y: usize) -> (u8, u8, u8) {
        let idx = (y * SCREEN_WIDTH + x) * 3;
        (screen[idx], screen[idx + 1], screen[idx + 2])
    }

    #[test]
    fn first_byte_lands_bottom_left_in_green() {
        let mut vram = vec![0u8; 0x1c00];
        vram[0] = 0x01;
        let mut screen = screen();
        render_video(&vram, &mut screen);
        assert_eq!(pixel(&screen, 0, SCREEN_HEIGHT - 1), Color::GREEN.rgb());
        assert_eq!(pixel(&screen, 0, SCREEN_HEIGHT - 2), Color::BLACK.rgb());
    }

    #[test]
    fn colour_bands_follow_rows() {
        let mut vram = vec![0u8; 0x1c00];
        // Column 1: the byte covering rows 208..216 and the one at 128..136.
        vram[32 + 26] = 0x01;
        vram[32 + 16] = 0x01;
        let mut screen = screen();
        render_video(&vram, &mut screen);
        assert_eq!(pixel(&screen, 1, SCREEN_HEIGHT - 208 - 1), Color::RED.rgb());
        assert_eq!(pixel(&screen, 1, SCREEN_HEIGHT - 128 - 1), Color::WHITE.rgb());
    }

    #[test]
    fn keys_drive_port_bits() {
        let mut app = InvadersApp::new(InvadersMachine::new());
        app.handle_key_event(Key::C, true);
        app.handle_key_event(Key::Space, true);
        assert_eq!(app.inputs, InputState::CREDIT | InputState::P1_SHOOT);
        app.handle_key_event(Key::C, false);
        assert_eq!(app.inputs, InputState::P1_SHOOT);

        app.handle_key_event(Key::P, true);
        assert!(app.paused());
        app.handle_key_event(Key::P, false);
        assert!(app.paused());

        assert!(!app.should_exit());
        app.handle_key_event(Key::Escape, true);
        assert!(app.should_exit());
    }

    #[test]
    fn update_runs_a_frame_and_renders() {
        // Fill VRAM from the ROM: LXI H,2400; MVI M,FF; HLT
        let mut machine = InvadersMachine::new();
        machine.load_rom(&[0x21, 0x00, 0x24, 0x36, 0xff, 0x76]);
        machine.cpu_mut().interrupts_enabled = false;
        let mut app = InvadersApp::new(machine).with_scale(2);
        assert_eq!(app.scale(), 2);

        let mut screen = screen();
        app.update(&mut screen);
        assert_eq!(app.machine.frames(), 1);
        assert_eq!(pixel(&screen, 0, SCREEN_HEIGHT - 8), Color::GREEN.rgb());
        assert!(!app.should_exit());
    }
}
