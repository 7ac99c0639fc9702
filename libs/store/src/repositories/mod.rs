pub mod connection;
pub mod contact;
pub mod experience;
pub mod revoked_token;
pub mod user;

pub use connection::ConnectionRepository;
pub use contact::ContactRepository;
pub use experience::ExperienceRepository;
pub use revoked_token::RevokedTokenRepository;
pub use user::UserRepository;
