pub mod canvas;
pub mod fonts;
pub mod layout;
pub mod ticket;

pub use ticket::render_ticket;
