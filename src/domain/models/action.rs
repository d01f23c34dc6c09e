use super::LogRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FetchLog(LogRequest),
    RefreshInstruments(),
}
