pub mod commit_history;
pub mod messaging;
pub mod url_shortener;

pub use commit_history::CommitHistoryService;
pub use messaging::{ChannelRole, MessagingChannel};
pub use url_shortener::UrlShortener;
