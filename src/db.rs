pub mod complaint_repo;
pub use complaint_repo::{ComplaintRepository, Mutation};
pub mod memory_repo;
pub use memory_repo::MemoryComplaintRepository;
pub mod pg_complaint_repo;
pub use pg_complaint_repo::PgComplaintRepository;
pub mod user_repo;
pub use user_repo::{MemoryUserRepository, StoredUser, UserRepository};
pub mod pg_user_repo;
pub use pg_user_repo::PgUserRepository;

pub mod seed;
