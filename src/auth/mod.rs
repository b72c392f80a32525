//! Console sign-in, session persistence and user registration

pub mod login;
pub mod session;

pub use login::{AuthError, ExpectedRole, NewUser, login, register_user};
pub use session::{Session, SessionStore};
