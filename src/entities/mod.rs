pub mod prelude;

pub mod jutsus;
pub mod users;
