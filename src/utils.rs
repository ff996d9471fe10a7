mod uri;
pub use uri::*;
