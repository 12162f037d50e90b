pub mod actor;
pub mod genre;
pub mod performance;
pub mod play;
pub mod reservation;
pub mod theatre_hall;
pub mod ticket;
pub mod user;

pub use actor::Actor;
pub use genre::Genre;
pub use performance::Performance;
pub use play::Play;
pub use reservation::Reservation;
pub use theatre_hall::TheatreHall;
pub use ticket::Ticket;
pub use user::User;
