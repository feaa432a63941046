use tui_textarea::Input;

/// Lifecycle of a single turn as observed by the UI. Every turn ends with
/// exactly one `Finished` or `Failed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    /// The relay produced a stream, fragments follow.
    Streaming(),
    Fragment(String),
    Finished(),
    Failed(String),
}

#[derive(Debug)]
pub enum Event {
    BackendTurn(TurnEvent),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLN(),
    KeyboardEnter(),
    KeyboardPaste(String),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
