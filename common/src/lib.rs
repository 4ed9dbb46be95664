pub mod config;
pub mod notify;
pub mod protocol;

pub use config::{ConfigError, Credentials};
pub use notify::{NotifyError, Notifier};
pub use protocol::{
    check_response, parse_status, HomeworkRecord, HomeworkStatus, PollResponse, ResponseError,
    StatusError,
};
