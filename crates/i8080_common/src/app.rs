use crate::key::Key;

/// An emulator as driven by a windowing frontend.
///
/// `update` is called once per displayed frame with an RGB24 buffer of
/// `width * height * 3` bytes.
pub trait App {
    fn init(&mut self);
    fn update(&mut self, screen: &mut [u8]);
    fn handle_key_event(&mut self, key: Key, is_down: bool);
    fn should_exit(&self) -> bool;
    fn exit(&mut self);

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn scale(&self) -> u32;
    fn title(&self) -> String;
}
