mod progress;
mod session;
mod view;

// Public API of the session subsystem.
pub use crate::error::{ExportError, SessionError};
pub use progress::{Progress, SessionProgress};
pub use session::QuizSession;
pub use view::{COMPLETION_MESSAGE, SUCCESS_TEXT, SUCCESS_TITLE, Welcome, full_prompt};
