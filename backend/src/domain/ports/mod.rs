//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod page_revalidator;
mod user_actions;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use page_revalidator::MockPageRevalidator;
pub use page_revalidator::{PageInvalidations, PageRevalidator, USERS_PAGE_PATH};
#[cfg(test)]
pub use user_actions::MockUserActions;
pub use user_actions::{ActionOutcome, GENERIC_ACTION_ERROR, UserActions, UserRecord};
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
