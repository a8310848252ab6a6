//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`) describe how the domain expects to talk to
//! the record store. Driving ports (`*Command`, `*Query`) are the use cases
//! inbound adapters call. Each repository exposes strongly typed errors so
//! adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod score_repository;
mod scores_command;
mod scores_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use score_repository::MockScoreRepository;
pub use score_repository::{ScoreRepository, ScoreRepositoryError};
#[cfg(test)]
pub use scores_command::MockScoresCommand;
pub use scores_command::{ScoreWriteOutcome, ScoresCommand};
#[cfg(test)]
pub use scores_query::MockScoresQuery;
pub use scores_query::ScoresQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{UserDeletion, UserWriteOutcome, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
