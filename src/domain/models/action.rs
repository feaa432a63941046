/// Requests from the UI to the actions service.
#[derive(Debug)]
pub enum Action {
    ResetSession(),
    Submit(String),
}
