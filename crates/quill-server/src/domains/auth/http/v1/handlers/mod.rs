mod session;

pub(crate) use session::{login, refresh, register};
