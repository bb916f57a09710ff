pub mod health;
pub mod login;

pub use self::health::health;
pub use self::login::login;
