use crate::ViewPhase;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellViewModel {
    pub phase: ViewPhase,
    pub connected: bool,
    pub retry_count: u32,
    pub dirty: bool,
}
