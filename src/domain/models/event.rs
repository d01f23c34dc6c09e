use super::FetchError;
use super::LogRequest;

pub enum Event {
    InstrumentsResponse(Result<String, FetchError>),
    LogResponse(LogRequest, Result<String, FetchError>),
    KeyboardCTRLC(),
    KeyboardCTRLR(),
    UIDateNext(),
    UIDatePrevious(),
    UIDateToday(),
    UIResize(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
