//! Account domain entities.

pub mod model;
pub mod principal;
pub mod role;
pub mod sealed;

pub use model::{Account, CreateAccount};
pub use principal::{PrincipalKind, RequiredPrincipal};
pub use role::GlobalRole;
pub use sealed::SealedField;
