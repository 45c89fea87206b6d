pub mod cli;
pub mod commits;
pub mod error;
pub mod loader;
pub mod model;
pub mod page;
pub mod plot;
pub mod report;
pub mod scale;
pub mod selection;
pub mod session;
pub mod stats;
pub mod tui;
pub mod util;

pub use commits::process_commits;
pub use error::{LocError, Result};
pub use loader::load_data;
pub use model::{Commit, LineRecord};
pub use session::RenderSession;
