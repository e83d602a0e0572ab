use melascope_core::advisory::Advisor;

#[derive(Clone)]
pub struct AppState {
    pub advisor: Advisor,
}
