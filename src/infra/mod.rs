//! Infrastructure layer - External systems integration
//!
//! - Database connections, migrations and repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{with_deadline, Database, Migrator};
pub use repositories::{UserRepository, UserStore};
pub use unit_of_work::{
    Persistence, TransactionContext, TxInvitationRepository, TxProfileRepository,
    TxUserRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
