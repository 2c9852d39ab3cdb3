pub mod analysis;
pub mod prompt;
pub mod session;
pub mod types;

// Keep the public surface small and intentional.
pub use analysis::*;
pub use prompt::*;
pub use session::*;
pub use types::*;
