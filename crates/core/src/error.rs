use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("'{0}' is not a valid IANA timezone identifier")]
    InvalidTimezone(String),

    #[error("could not determine the host timezone: {0}")]
    NoSystemTimezone(String),
}
