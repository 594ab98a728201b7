/// Logical keys a frontend reports, independent of the windowing library.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Num1,
    Num2,
    A,
    C,
    D,
    P,
    S,
    Left,
    Right,
    Space,
    Escape,
    None,
}
