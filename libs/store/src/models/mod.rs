pub mod connection;
pub mod contact;
pub mod enums;
pub mod experience;
pub mod revoked_token;
pub mod user;

pub use connection::{Connection, ConnectionUpdate, NewConnection};
pub use contact::{Contact, ContactUpdate};
pub use enums::{EmployeeCount, Frequency, Province, SecurityQuestion, Subscription};
pub use experience::{Experience, ExperienceUpdate, NewExperience};
pub use revoked_token::RevokedToken;
pub use user::{NewUser, User, UserUpdate};
