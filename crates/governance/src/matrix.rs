//! Role-delegation matrices.
//!
//! Each governance mode is a total function from acting role to the set of
//! roles that actor may assign or manage. Every role has an explicit row in
//! every mode, empty rows included.

use crate::{GovernanceMode, Role};

use Role::{Admin, Author, Editor, User};

const NONE: &[Role] = &[];

/// Roles the acting role may assign/manage under `mode`.
pub fn assignable_roles(mode: GovernanceMode, acting: Role) -> &'static [Role] {
    match (mode, acting) {
        (GovernanceMode::Mode1, Admin) => &[Author, Editor, User],
        (GovernanceMode::Mode1, Author | Editor | User) => NONE,

        (GovernanceMode::Mode2, Admin) => &[Admin, Author],
        (GovernanceMode::Mode2, Author) => &[Author, Editor],
        (GovernanceMode::Mode2, Editor) => &[Editor, User],
        (GovernanceMode::Mode2, User) => NONE,

        (GovernanceMode::Mode3, Admin) => &[Author, Editor, User],
        (GovernanceMode::Mode3, Author) => &[Editor, User],
        (GovernanceMode::Mode3, Editor) => &[User],
        (GovernanceMode::Mode3, User) => NONE,
    }
}

/// Whether `acting` may assign (or manage an account holding) `candidate`.
pub fn can_assign(mode: GovernanceMode, acting: Role, candidate: Role) -> bool {
    assignable_roles(mode, acting).contains(&candidate)
}

/// Text variant of [`can_assign`] for undecoded input.
///
/// Anything that fails to decode matches nothing.
pub fn can_assign_str(mode: &str, acting: &str, candidate: &str) -> bool {
    match (
        mode.parse::<GovernanceMode>(),
        acting.parse::<Role>(),
        candidate.parse::<Role>(),
    ) {
        (Ok(mode), Ok(acting), Ok(candidate)) => can_assign(mode, acting, candidate),
        _ => false,
    }
}
