pub mod confirm;
pub mod form;
pub mod mutation;
pub mod notify;
pub mod screen;
pub mod selector;

pub use mutation::MutationRequest;
pub use notify::{NoticeKind, NotificationQueue};
pub use screen::{ScreenKind, ScreenState, Target};
pub use selector::{Collection, FetchTicket, Level, LoadState, Loaded};
