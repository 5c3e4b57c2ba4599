use std::time::Instant;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    pub created_at: Instant,
}

impl Notification {
    pub fn success(text: &str) -> Notification {
        return Notification {
            level: NotificationLevel::Success,
            text: text.to_string(),
            created_at: Instant::now(),
        };
    }

    pub fn error(text: &str) -> Notification {
        return Notification {
            level: NotificationLevel::Error,
            text: text.to_string(),
            created_at: Instant::now(),
        };
    }
}
