mod alias;
mod waiting_state;

pub use alias::{validate_alias_name, Alias};
pub use waiting_state::WaitingState;
