use crate::models::Role;

/// What is known about the caller. `Loading` means the token checked out but
/// the stored role could not be read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Anonymous,
    Signed(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Admit,
    /// Role not known yet; answer with a placeholder rather than a redirect.
    Wait,
    /// Send the caller back to the catalog.
    Redirect(&'static str),
}

pub const CATALOG_PATH: &str = "/";

pub fn admin_gate(state: SessionState) -> Gate {
    match state {
        SessionState::Signed(Role::Admin) => Gate::Admit,
        SessionState::Loading => Gate::Wait,
        SessionState::Signed(Role::User) | SessionState::Anonymous => Gate::Redirect(CATALOG_PATH),
    }
}
